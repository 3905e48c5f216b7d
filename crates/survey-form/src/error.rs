use survey_spec::{StoreError, ValidationError};
use thiserror::Error;

/// Failure reported by the survey API collaborator; `Display` is the text shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("{0}")]
    Network(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Rejected(String),
}

/// Recoverable problems surfaced by the survey form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("survey could not be loaded: {0}")]
    Fetch(ApiError),
    #[error("{} question(s) are incomplete", .0.len())]
    Validation(Vec<ValidationError>),
    #[error("submission failed: {0}")]
    Submission(ApiError),
    #[error("survey cannot be answered: {0}")]
    Store(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse form config: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("invalid form config: {0}")]
    Invalid(String),
}
