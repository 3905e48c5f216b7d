//! Survey answering form.
//!
//! [`SurveyForm`] is a message-driven state machine: the host feeds it
//! [`Message`]s (user input or completed requests) and carries out the
//! [`Effect`] each update returns. Requests are tagged with a [`RequestId`];
//! a completion whose id is not the one the form is waiting for is dropped,
//! which is how responses arriving after a reload or teardown are discarded.

use survey_spec::{
    AnswerId, AnswerStore, QuestionId, QuestionView, RenderPayload, SelectionOutcome, Submission,
    Survey, SurveyId, ValidationError, build_render_payload, validate,
};

use crate::config::FormConfig;
use crate::error::{ApiError, FormError};
use crate::modal::{
    CONFIRM_TEXT, CONFIRM_TITLE, INCOMPLETE_TEXT, INCOMPLETE_TITLE, ModalAction, ModalKind,
    ModalProps, NOT_FOUND_TITLE, SUBMIT_FAILED_TITLE, SUBMITTED_TEXT, SUBMITTED_TITLE,
    UNAVAILABLE_TITLE, USERNAME_TEXT, USERNAME_TITLE, Warning,
};
use crate::navigation::Route;

pub type RequestId = u64;

/// Input to [`SurveyForm::update`].
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    SurveyLoaded {
        request: RequestId,
        result: Result<Survey, ApiError>,
    },
    UsernameSubmitted(String),
    UsernameDismissed,
    /// Pick an answer of a closed question (radio click, or check in checkbox mode).
    AnswerChosen {
        question: QuestionId,
        answer: AnswerId,
    },
    AnswerToggled {
        question: QuestionId,
        answer: AnswerId,
        checked: bool,
    },
    TextChanged {
        question: QuestionId,
        text: String,
    },
    SubmitPressed,
    ConfirmSubmission,
    DeclineSubmission,
    SubmissionFinished {
        request: RequestId,
        result: Result<(), ApiError>,
    },
    DismissWarning,
    AcknowledgeSubmitted,
    GoBack,
    /// Action on whichever modal is currently shown.
    Modal(ModalAction),
    TearDown,
}

/// Work the host must perform after an update.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    FetchSurvey {
        request: RequestId,
        survey_id: SurveyId,
    },
    Submit {
        request: RequestId,
        submission: Submission,
    },
    Navigate(Route),
}

/// Where a loaded form stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    AwaitingUsername,
    Editing,
    /// Warning overlay; dismissing it returns to editing.
    Warning(Warning),
    Confirming,
    Submitting {
        request: RequestId,
    },
    Submitted,
}

/// A survey that loaded successfully, with its answers and renderers.
#[derive(Debug, Clone)]
pub struct ActiveForm {
    survey: Survey,
    store: AnswerStore,
    views: Vec<QuestionView>,
    username: String,
    errors: Vec<ValidationError>,
    stage: Stage,
}

impl ActiveForm {
    pub fn survey(&self) -> &Survey {
        &self.survey
    }

    pub fn store(&self) -> &AnswerStore {
        &self.store
    }

    pub fn views(&self) -> &[QuestionView] {
        &self.views
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Errors from the last validation pass, shown inline.
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    /// Payload built from the current answers.
    pub fn submission(&self) -> Submission {
        Submission {
            survey_id: self.survey.id,
            username: self.username.clone(),
            answers: self.store.answers().to_vec(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum FormState {
    Loading {
        request: RequestId,
    },
    /// The survey could not be loaded; only going back is possible.
    Unavailable {
        warning: Warning,
        shown: bool,
    },
    Active(Box<ActiveForm>),
    Closed,
}

/// Flat label of the current state, handy for hosts and assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Unavailable,
    AwaitingUsername,
    Editing,
    Warning,
    Confirming,
    Submitting,
    Submitted,
    Closed,
}

#[derive(Debug, Clone)]
pub struct SurveyForm {
    survey_id: SurveyId,
    config: FormConfig,
    last_request: RequestId,
    state: FormState,
}

impl SurveyForm {
    /// Start a form for `survey_id`; the returned effect fetches the survey.
    pub fn open(survey_id: SurveyId, config: FormConfig) -> (Self, Effect) {
        let mut form = Self {
            survey_id,
            config,
            last_request: 0,
            state: FormState::Closed,
        };
        let effect = form.reload(survey_id);
        (form, effect)
    }

    /// Re-initialise for another survey. Outstanding responses become stale.
    pub fn reload(&mut self, survey_id: SurveyId) -> Effect {
        let request = self.next_request();
        tracing::info!(survey_id, request, "loading survey");
        self.survey_id = survey_id;
        self.state = FormState::Loading { request };
        Effect::FetchSurvey { request, survey_id }
    }

    pub fn survey_id(&self) -> SurveyId {
        self.survey_id
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn active(&self) -> Option<&ActiveForm> {
        match &self.state {
            FormState::Active(form) => Some(form.as_ref()),
            _ => None,
        }
    }

    pub fn phase(&self) -> Phase {
        match &self.state {
            FormState::Loading { .. } => Phase::Loading,
            FormState::Unavailable { .. } => Phase::Unavailable,
            FormState::Closed => Phase::Closed,
            FormState::Active(form) => match form.stage {
                Stage::AwaitingUsername => Phase::AwaitingUsername,
                Stage::Editing => Phase::Editing,
                Stage::Warning(_) => Phase::Warning,
                Stage::Confirming => Phase::Confirming,
                Stage::Submitting { .. } => Phase::Submitting,
                Stage::Submitted => Phase::Submitted,
            },
        }
    }

    /// True while a fetch or submission is outstanding.
    pub fn is_busy(&self) -> bool {
        matches!(self.phase(), Phase::Loading | Phase::Submitting)
    }

    /// The single modal that should be visible, if any.
    pub fn current_modal(&self) -> Option<ModalProps> {
        match &self.state {
            FormState::Unavailable { warning, shown } if *shown => Some(warning.modal()),
            FormState::Active(form) => match &form.stage {
                Stage::AwaitingUsername => Some(ModalProps::new(
                    ModalKind::UsernamePrompt,
                    USERNAME_TITLE,
                    USERNAME_TEXT,
                )),
                Stage::Warning(warning) => Some(warning.modal()),
                Stage::Confirming => Some(ModalProps::new(
                    ModalKind::Confirmation,
                    CONFIRM_TITLE,
                    CONFIRM_TEXT,
                )),
                Stage::Submitted => Some(ModalProps::new(
                    ModalKind::Information,
                    SUBMITTED_TITLE,
                    SUBMITTED_TEXT,
                )),
                Stage::Editing | Stage::Submitting { .. } => None,
            },
            _ => None,
        }
    }

    /// Snapshot of the form for text/JSON renderers.
    pub fn render(&self) -> Option<RenderPayload> {
        self.active().map(|form| {
            build_render_payload(&form.survey, &form.views, &form.username, &form.errors)
        })
    }

    pub fn update(&mut self, message: Message) -> Effect {
        if matches!(self.state, FormState::Closed) {
            tracing::debug!(?message, "form closed, message discarded");
            return Effect::None;
        }

        match message {
            Message::TearDown => {
                tracing::debug!(survey_id = self.survey_id, "form torn down");
                self.state = FormState::Closed;
                Effect::None
            }
            Message::SurveyLoaded { request, result } => self.on_survey_loaded(request, result),
            Message::SubmissionFinished { request, result } => {
                self.on_submission_finished(request, result)
            }
            Message::GoBack => match self.state {
                FormState::Unavailable { .. } => Effect::Navigate(Route::Home),
                _ => Effect::None,
            },
            Message::Modal(action) => match self.modal_message(action) {
                Some(message) => self.update(message),
                None => Effect::None,
            },
            Message::DismissWarning => {
                match &mut self.state {
                    FormState::Unavailable { shown, .. } => *shown = false,
                    FormState::Active(form) if matches!(form.stage, Stage::Warning(_)) => {
                        form.stage = Stage::Editing;
                    }
                    _ => {}
                }
                Effect::None
            }
            other => self.update_active(other),
        }
    }

    fn next_request(&mut self) -> RequestId {
        self.last_request += 1;
        self.last_request
    }

    fn modal_message(&self, action: ModalAction) -> Option<Message> {
        match (self.phase(), action) {
            (Phase::Unavailable | Phase::Warning, _) => Some(Message::DismissWarning),
            (Phase::AwaitingUsername, _) => Some(Message::UsernameDismissed),
            (Phase::Confirming, ModalAction::Confirm) => Some(Message::ConfirmSubmission),
            (Phase::Confirming, _) => Some(Message::DeclineSubmission),
            (Phase::Submitted, _) => Some(Message::AcknowledgeSubmitted),
            _ => None,
        }
    }

    fn on_survey_loaded(&mut self, request: RequestId, result: Result<Survey, ApiError>) -> Effect {
        match self.state {
            FormState::Loading { request: pending } if pending == request => {}
            _ => {
                tracing::debug!(request, "stale survey response discarded");
                return Effect::None;
            }
        }

        self.state = match result {
            Ok(survey) => match self.activate(survey) {
                Ok(form) => {
                    tracing::info!(
                        survey_id = form.survey.id,
                        questions = form.survey.questions.len(),
                        "survey loaded"
                    );
                    FormState::Active(Box::new(form))
                }
                Err(err) => {
                    tracing::warn!(error = %err, "survey cannot be answered");
                    FormState::Unavailable {
                        warning: Warning::new(UNAVAILABLE_TITLE, err.to_string(), err),
                        shown: true,
                    }
                }
            },
            Err(err) => {
                tracing::warn!(survey_id = self.survey_id, error = %err, "survey fetch failed");
                FormState::Unavailable {
                    warning: Warning::new(NOT_FOUND_TITLE, err.to_string(), FormError::Fetch(err)),
                    shown: true,
                }
            }
        };
        Effect::None
    }

    fn activate(&self, survey: Survey) -> Result<ActiveForm, FormError> {
        let store = AnswerStore::for_survey(&survey)?;
        let views = QuestionView::for_survey(&survey, &store, self.config.open_answer_max_len)?;
        Ok(ActiveForm {
            survey,
            store,
            views,
            username: self.config.default_username.clone(),
            errors: Vec::new(),
            stage: Stage::AwaitingUsername,
        })
    }

    fn on_submission_finished(&mut self, request: RequestId, result: Result<(), ApiError>) -> Effect {
        let FormState::Active(form) = &mut self.state else {
            tracing::debug!(request, "submission response without active form discarded");
            return Effect::None;
        };
        match form.stage {
            Stage::Submitting { request: pending } if pending == request => {}
            _ => {
                tracing::debug!(request, "stale submission response discarded");
                return Effect::None;
            }
        }

        form.stage = match result {
            Ok(()) => {
                tracing::info!(survey_id = form.survey.id, username = %form.username, "answers submitted");
                Stage::Submitted
            }
            Err(err) => {
                tracing::warn!(survey_id = form.survey.id, error = %err, "submission failed");
                Stage::Warning(Warning::new(
                    SUBMIT_FAILED_TITLE,
                    err.to_string(),
                    FormError::Submission(err),
                ))
            }
        };
        Effect::None
    }

    fn update_active(&mut self, message: Message) -> Effect {
        let FormState::Active(form) = &mut self.state else {
            tracing::debug!(?message, "no survey loaded, message ignored");
            return Effect::None;
        };

        match message {
            Message::UsernameSubmitted(name) if form.stage == Stage::AwaitingUsername => {
                let name = name.trim();
                if !name.is_empty() {
                    form.username = name.to_string();
                }
                form.stage = Stage::Editing;
                Effect::None
            }
            Message::UsernameDismissed if form.stage == Stage::AwaitingUsername => {
                form.stage = Stage::Editing;
                Effect::None
            }
            Message::AnswerChosen { question, answer } if form.stage == Stage::Editing => {
                apply_choice(form, question, answer, None);
                Effect::None
            }
            Message::AnswerToggled {
                question,
                answer,
                checked,
            } if form.stage == Stage::Editing => {
                apply_choice(form, question, answer, Some(checked));
                Effect::None
            }
            Message::TextChanged { question, text } if form.stage == Stage::Editing => {
                let ActiveForm { views, store, .. } = &mut **form;
                match views.iter_mut().find(|view| view.question_id() == question) {
                    Some(QuestionView::Open(state)) => {
                        if let Err(err) = state.set_text(&text, store) {
                            tracing::warn!(question, error = %err, "text update rejected");
                        }
                    }
                    _ => tracing::debug!(question, "text change for unknown open question"),
                }
                Effect::None
            }
            Message::SubmitPressed if form.stage == Stage::Editing => {
                let errors = validate(&form.survey.questions, form.store.answers());
                form.errors = errors.clone();
                if errors.is_empty() {
                    form.stage = Stage::Confirming;
                } else {
                    tracing::warn!(count = errors.len(), "survey incomplete");
                    form.stage = Stage::Warning(Warning::new(
                        INCOMPLETE_TITLE,
                        INCOMPLETE_TEXT,
                        FormError::Validation(errors),
                    ));
                }
                Effect::None
            }
            Message::ConfirmSubmission if form.stage == Stage::Confirming => {
                self.last_request += 1;
                let request = self.last_request;
                form.stage = Stage::Submitting { request };
                tracing::info!(survey_id = form.survey.id, request, "submitting answers");
                Effect::Submit {
                    request,
                    submission: form.submission(),
                }
            }
            Message::DeclineSubmission if form.stage == Stage::Confirming => {
                form.stage = Stage::Editing;
                Effect::None
            }
            Message::AcknowledgeSubmitted if form.stage == Stage::Submitted => {
                self.state = FormState::Closed;
                Effect::Navigate(Route::Home)
            }
            other => {
                tracing::debug!(message = ?other, stage = ?form.stage, "message ignored in current stage");
                Effect::None
            }
        }
    }
}

fn apply_choice(form: &mut ActiveForm, question: QuestionId, answer: AnswerId, checked: Option<bool>) {
    let ActiveForm { views, store, .. } = form;
    let Some(QuestionView::Closed(state)) = views
        .iter_mut()
        .find(|view| view.question_id() == question)
    else {
        tracing::debug!(question, "choice for unknown closed question");
        return;
    };
    let outcome = match checked {
        None => state.choose(answer, store),
        Some(checked) => state.set_checked(answer, checked, store),
    };
    match outcome {
        Ok(SelectionOutcome::MaxReached) => {
            tracing::debug!(question, answer, "maximum number of answers reached");
        }
        Ok(outcome) => tracing::trace!(question, answer, ?outcome, "selection handled"),
        Err(err) => tracing::warn!(question, answer, error = %err, "selection rejected"),
    }
}
