use crate::error::FormError;

pub const USERNAME_TITLE: &str = "Choose a username";
pub const USERNAME_TEXT: &str =
    "Enter the name shown with your answers, or close this prompt to stay anonymous.";
pub const CONFIRM_TITLE: &str = "Confirm survey submission";
pub const CONFIRM_TEXT: &str = "Are you sure you want to submit this survey?";
pub const SUBMITTED_TITLE: &str = "The survey has been submitted";
pub const SUBMITTED_TEXT: &str = "You will be redirected to the home page.";
pub const INCOMPLETE_TITLE: &str = "Survey not complete";
pub const INCOMPLETE_TEXT: &str = "Some questions are incomplete, check the error message and complete the answer mandatory questions.";
pub const NOT_FOUND_TITLE: &str = "Survey not found";
pub const UNAVAILABLE_TITLE: &str = "Survey unavailable";
pub const SUBMIT_FAILED_TITLE: &str = "Warning";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalKind {
    UsernamePrompt,
    Confirmation,
    Information,
    Warning,
}

/// User action on the visible modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalAction {
    Confirm,
    Close,
    Hide,
}

/// Everything a modal needs to draw itself. Visibility is decided by the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalProps {
    pub kind: ModalKind,
    pub title: String,
    pub text: String,
}

impl ModalProps {
    pub fn new(kind: ModalKind, title: &str, text: &str) -> Self {
        Self {
            kind,
            title: title.to_string(),
            text: text.to_string(),
        }
    }

    /// Whether the modal offers a confirm button next to close.
    pub fn is_confirmable(&self) -> bool {
        matches!(self.kind, ModalKind::Confirmation | ModalKind::UsernamePrompt)
    }
}

/// Blocking warning shown over the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub title: String,
    pub text: String,
    pub cause: FormError,
}

impl Warning {
    pub fn new(title: &str, text: impl Into<String>, cause: FormError) -> Self {
        Self {
            title: title.to_string(),
            text: text.into(),
            cause,
        }
    }

    pub fn modal(&self) -> ModalProps {
        ModalProps::new(ModalKind::Warning, &self.title, &self.text)
    }
}
