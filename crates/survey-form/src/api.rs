use std::cell::RefCell;

use survey_spec::{Submission, Survey, SurveyId, SurveySummary, validate};

use crate::error::ApiError;

/// Backend collaborator used by the home view and the survey form.
pub trait SurveyApi {
    fn get_surveys(&self) -> Result<Vec<SurveySummary>, ApiError>;

    fn get_survey(&self, id: SurveyId) -> Result<Survey, ApiError>;

    fn submit_user_answers(&self, submission: &Submission) -> Result<(), ApiError>;
}

/// In-process backend holding published surveys and received submissions.
///
/// Submissions are checked against the survey the same way the form checks
/// them, so an incomplete payload is rejected with the first problem found.
#[derive(Debug, Default)]
pub struct MemoryApi {
    surveys: Vec<Survey>,
    submissions: RefCell<Vec<Submission>>,
    outage: Option<ApiError>,
    submit_failure: Option<ApiError>,
}

impl MemoryApi {
    pub fn new(surveys: Vec<Survey>) -> Self {
        Self {
            surveys,
            ..Self::default()
        }
    }

    /// Make every call fail with `error`.
    pub fn with_outage(mut self, error: ApiError) -> Self {
        self.outage = Some(error);
        self
    }

    /// Make submissions fail with `error`.
    pub fn with_submit_failure(mut self, error: ApiError) -> Self {
        self.submit_failure = Some(error);
        self
    }

    pub fn clear_submit_failure(&mut self) {
        self.submit_failure = None;
    }

    pub fn submissions(&self) -> Vec<Submission> {
        self.submissions.borrow().clone()
    }

    fn available(&self) -> Result<(), ApiError> {
        match &self.outage {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

impl SurveyApi for MemoryApi {
    fn get_surveys(&self) -> Result<Vec<SurveySummary>, ApiError> {
        self.available()?;
        Ok(self.surveys.iter().map(Survey::summary).collect())
    }

    fn get_survey(&self, id: SurveyId) -> Result<Survey, ApiError> {
        self.available()?;
        self.surveys
            .iter()
            .find(|survey| survey.id == id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("Survey {} not found", id)))
    }

    fn submit_user_answers(&self, submission: &Submission) -> Result<(), ApiError> {
        self.available()?;
        if let Some(error) = &self.submit_failure {
            return Err(error.clone());
        }
        let survey = self.get_survey(submission.survey_id)?;
        if let Some(error) = validate(&survey.questions, &submission.answers).first() {
            return Err(ApiError::Rejected(error.message.clone()));
        }
        self.submissions.borrow_mut().push(submission.clone());
        Ok(())
    }
}
