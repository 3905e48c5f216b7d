use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use survey_form::{ApiError, SurveyApi};
use survey_spec::{Submission, Survey, SurveyId, SurveySummary, validate};

pub const CATALOG_FILE: &str = "surveys.json";
pub const SUBMISSIONS_DIR: &str = "submissions";

/// On-disk list of published surveys.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub surveys: Vec<Survey>,
}

/// Survey backend reading `surveys.json` and writing one JSON file per submission.
#[derive(Debug, Clone)]
pub struct FileApi {
    root: PathBuf,
}

impl FileApi {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn catalog(&self) -> Result<Catalog, ApiError> {
        let path = self.root.join(CATALOG_FILE);
        let contents = fs::read_to_string(&path).map_err(|err| {
            ApiError::Network(format!("cannot read {}: {}", path.display(), err))
        })?;
        serde_json::from_str(&contents).map_err(|err| {
            ApiError::Network(format!("invalid survey catalog {}: {}", path.display(), err))
        })
    }

    fn next_submission_path(&self, survey_id: SurveyId) -> Result<PathBuf, ApiError> {
        let dir = self.root.join(SUBMISSIONS_DIR);
        fs::create_dir_all(&dir).map_err(|err| {
            ApiError::Network(format!("cannot create {}: {}", dir.display(), err))
        })?;
        let mut counter = 1;
        loop {
            let candidate = dir.join(format!("survey-{}-{}.json", survey_id, counter));
            if !candidate.exists() {
                return Ok(candidate);
            }
            counter += 1;
        }
    }
}

impl SurveyApi for FileApi {
    fn get_surveys(&self) -> Result<Vec<SurveySummary>, ApiError> {
        Ok(self.catalog()?.surveys.iter().map(Survey::summary).collect())
    }

    fn get_survey(&self, id: SurveyId) -> Result<Survey, ApiError> {
        self.catalog()?
            .surveys
            .into_iter()
            .find(|survey| survey.id == id)
            .ok_or_else(|| ApiError::NotFound(format!("Survey {} not found", id)))
    }

    fn submit_user_answers(&self, submission: &Submission) -> Result<(), ApiError> {
        let survey = self.get_survey(submission.survey_id)?;
        if let Some(error) = validate(&survey.questions, &submission.answers).first() {
            return Err(ApiError::Rejected(error.message.clone()));
        }
        let path = self.next_submission_path(submission.survey_id)?;
        let json = submission
            .to_json_pretty()
            .map_err(|err| ApiError::Rejected(format!("cannot encode answers: {}", err)))?;
        fs::write(&path, json).map_err(|err| {
            ApiError::Network(format!("cannot write {}: {}", path.display(), err))
        })?;
        tracing::info!(path = %path.display(), "submission stored");
        Ok(())
    }
}
