use std::fmt::Write;

use survey_form::{ModalProps, SurveyCard};
use survey_spec::{
    Control, RenderPayload, RenderQuestion, Submission, ValidationError, render_json_ui,
    render_text,
};

/// Controls which bits of state the form prints.
#[derive(Copy, Clone, Eq, PartialEq)]
pub enum Verbosity {
    /// Clean output: question prompts only.
    Clean,
    /// Verbose output: status line and hints before every prompt.
    Verbose,
}

impl Verbosity {
    pub fn from_verbose(verbose: bool) -> Self {
        if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Clean
        }
    }

    pub fn is_verbose(&self) -> bool {
        matches!(self, Verbosity::Verbose)
    }
}

/// How the whole form is printed when the respondent asks for it.
#[derive(Copy, Clone, Debug, Eq, PartialEq, clap::ValueEnum)]
pub enum RenderMode {
    Text,
    Json,
}

/// Prints modals, questions and the final answers for the `take` command.
pub struct FormPresenter {
    verbosity: Verbosity,
    mode: RenderMode,
    header_printed: bool,
    show_answers_json: bool,
}

impl FormPresenter {
    pub fn new(verbosity: Verbosity, mode: RenderMode, show_answers_json: bool) -> Self {
        Self {
            verbosity,
            mode,
            header_printed: false,
            show_answers_json,
        }
    }

    pub fn show_header(&mut self, payload: &RenderPayload) {
        if self.header_printed {
            return;
        }
        println!("Survey: {}", payload.survey_title);
        println!("Your username for this survey: {}", payload.username);
        self.header_printed = true;
    }

    pub fn show_modal(&self, modal: &ModalProps) {
        println!("== {} ==", modal.title);
        if !modal.text.is_empty() {
            println!("{}", modal.text);
        }
    }

    pub fn show_form(&self, payload: &RenderPayload) {
        match self.mode {
            RenderMode::Text => println!("{}", render_text(payload)),
            RenderMode::Json => match serde_json::to_string_pretty(&render_json_ui(payload)) {
                Ok(json) => println!("{}", json),
                Err(err) => eprintln!("Failed to serialize form to JSON: {}", err),
            },
        }
    }

    pub fn show_question(&self, question: &RenderQuestion, total: usize) {
        let mut line = format!("{}/{} {}", question.number, total, question.text);
        if question.required {
            line.push_str(" *");
        }
        if let Some(hint) = control_hint(question.control) {
            line.push(' ');
            line.push_str(hint);
        }
        println!("{}", line);
        if self.verbosity.is_verbose() || question.error {
            for hint in &question.hints {
                println!("  {}", hint);
            }
        }
        for (index, choice) in question.choices.iter().enumerate() {
            let mark = if choice.selected { "*" } else { " " };
            println!("  {}{}. {}", mark, index + 1, choice.text);
        }
        if let Some(value) = question.value.as_deref().filter(|value| !value.is_empty()) {
            println!("  current: {}", value);
        }
    }

    pub fn show_message(&self, question: &RenderQuestion) {
        if let Some(message) = &question.message {
            println!("{}", message);
        }
    }

    pub fn show_status(&self, payload: &RenderPayload) {
        if self.verbosity.is_verbose() {
            println!(
                "Status: {} ({}/{})",
                payload.status.as_str(),
                payload.progress.answered,
                payload.progress.total
            );
        }
    }

    pub fn show_errors(&self, errors: &[ValidationError]) {
        for error in errors {
            println!("  {}", error.message);
        }
    }

    pub fn show_parse_error(&self, error: &AnswerParseError) {
        eprintln!("Invalid answer: {}", error.user_message);
        if let Some(debug) = &error.debug_message
            && self.verbosity.is_verbose()
        {
            eprintln!("  Expected: {}", debug);
        }
    }

    pub fn show_completion(&self, submission: &Submission) {
        println!("Done ✅");
        match submission.to_cbor() {
            Ok(bytes) => println!("Answers (CBOR hex): {}", encode_hex(&bytes)),
            Err(err) => eprintln!("Failed to serialize answers to CBOR: {}", err),
        }
        if self.show_answers_json {
            match submission.to_json_pretty() {
                Ok(pretty) => println!("{}", pretty),
                Err(err) => eprintln!("Failed to serialize answers to JSON: {}", err),
            }
        }
    }

    pub fn show_cards(&self, cards: &[SurveyCard]) {
        if cards.is_empty() {
            println!("No surveys available.");
            return;
        }
        println!("Surveys available:");
        for card in cards {
            println!("  {:>4}  {}", card.summary.id, card.display_title());
        }
    }
}

fn control_hint(control: Control) -> Option<&'static str> {
    match control {
        Control::Radio => Some("(pick one number)"),
        Control::Checkbox => Some("(comma separated numbers, blank keeps, - clears)"),
        Control::TextArea => None,
    }
}

/// Error produced when parsing answers from the user.
#[derive(Debug)]
pub struct AnswerParseError {
    pub user_message: String,
    pub debug_message: Option<String>,
}

impl AnswerParseError {
    pub fn new(user_message: impl Into<String>, debug_message: Option<String>) -> Self {
        Self {
            user_message: user_message.into(),
            debug_message,
        }
    }
}

pub fn encode_hex(bytes: &[u8]) -> String {
    bytes.iter().fold(
        String::with_capacity(bytes.len() * 2),
        |mut encoded, byte| {
            let _ = write!(&mut encoded, "{:02x}", byte);
            encoded
        },
    )
}
