use serde_json::{Map, Value, json};

use crate::{
    answers::ValidationError,
    renderer::QuestionView,
    spec::{AnswerId, SelectionMode, Survey},
};

/// Status labels returned by the renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStatus {
    /// Some question is still below its minimum.
    NeedInput,
    /// Every question satisfies its minimum.
    Complete,
    /// The last validation pass reported errors.
    Error,
}

impl RenderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RenderStatus::NeedInput => "need_input",
            RenderStatus::Complete => "complete",
            RenderStatus::Error => "error",
        }
    }
}

/// Input control used to present a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Radio,
    Checkbox,
    TextArea,
}

impl Control {
    pub fn as_str(&self) -> &'static str {
        match self {
            Control::Radio => "radio",
            Control::Checkbox => "checkbox",
            Control::TextArea => "textarea",
        }
    }
}

/// Progress counters exposed to renderers.
#[derive(Debug, Clone)]
pub struct RenderProgress {
    pub answered: usize,
    pub total: usize,
}

#[derive(Debug, Clone)]
pub struct RenderChoice {
    pub id: AnswerId,
    pub text: String,
    pub selected: bool,
}

/// Describes a single question for render outputs.
#[derive(Debug, Clone)]
pub struct RenderQuestion {
    pub number: usize,
    pub id: u64,
    pub text: String,
    pub control: Control,
    pub required: bool,
    pub error: bool,
    pub hints: Vec<String>,
    pub message: Option<String>,
    pub choices: Vec<RenderChoice>,
    pub value: Option<String>,
}

/// Collected payload used by both text and JSON renderers.
#[derive(Debug, Clone)]
pub struct RenderPayload {
    pub survey_id: u64,
    pub survey_title: String,
    pub username: String,
    pub status: RenderStatus,
    pub progress: RenderProgress,
    pub errors: Vec<String>,
    pub questions: Vec<RenderQuestion>,
}

/// Build the renderer payload from the survey, its question renderers, and the
/// latest validation errors.
pub fn build_render_payload(
    survey: &Survey,
    views: &[QuestionView],
    username: &str,
    errors: &[ValidationError],
) -> RenderPayload {
    let questions = survey
        .questions
        .iter()
        .zip(views)
        .enumerate()
        .map(|(index, (question, view))| {
            let (control, choices, value, message) = match view {
                QuestionView::Closed(state) => {
                    let control = match state.mode() {
                        SelectionMode::Radio => Control::Radio,
                        SelectionMode::Checkbox => Control::Checkbox,
                    };
                    let choices = question
                        .answers
                        .iter()
                        .map(|answer| RenderChoice {
                            id: answer.id,
                            text: answer.text.clone(),
                            selected: state.is_selected(answer.id),
                        })
                        .collect();
                    (control, choices, None, state.message().map(str::to_string))
                }
                QuestionView::Open(state) => (
                    Control::TextArea,
                    Vec::new(),
                    Some(state.value().to_string()),
                    None,
                ),
            };
            RenderQuestion {
                number: index + 1,
                id: question.id,
                text: question.text.clone(),
                control,
                required: question.is_required(),
                error: view.has_error(),
                hints: view.hints(),
                message,
                choices,
                value,
            }
        })
        .collect::<Vec<_>>();

    let answered = views.iter().filter(|view| view.is_answered()).count();
    let status = if !errors.is_empty() {
        RenderStatus::Error
    } else if views.iter().any(QuestionView::has_error) {
        RenderStatus::NeedInput
    } else {
        RenderStatus::Complete
    };

    RenderPayload {
        survey_id: survey.id,
        survey_title: survey.title.clone(),
        username: username.to_string(),
        status,
        progress: RenderProgress {
            answered,
            total: questions.len(),
        },
        errors: errors.iter().map(|error| error.message.clone()).collect(),
        questions,
    }
}

/// Render the payload as a structured JSON-friendly value.
pub fn render_json_ui(payload: &RenderPayload) -> Value {
    let questions = payload
        .questions
        .iter()
        .map(|question| {
            let mut map = Map::new();
            map.insert("number".into(), json!(question.number));
            map.insert("id".into(), json!(question.id));
            map.insert("text".into(), Value::String(question.text.clone()));
            map.insert(
                "control".into(),
                Value::String(question.control.as_str().to_string()),
            );
            map.insert("required".into(), Value::Bool(question.required));
            map.insert("error".into(), Value::Bool(question.error));
            map.insert("hints".into(), json!(question.hints));
            if let Some(message) = &question.message {
                map.insert("message".into(), Value::String(message.clone()));
            }
            if !question.choices.is_empty() {
                map.insert(
                    "choices".into(),
                    Value::Array(
                        question
                            .choices
                            .iter()
                            .map(|choice| {
                                json!({
                                    "id": choice.id,
                                    "text": choice.text,
                                    "selected": choice.selected,
                                })
                            })
                            .collect(),
                    ),
                );
            }
            if let Some(value) = &question.value {
                map.insert("value".into(), Value::String(value.clone()));
            }
            Value::Object(map)
        })
        .collect::<Vec<_>>();

    json!({
        "survey_id": payload.survey_id,
        "survey_title": payload.survey_title,
        "username": payload.username,
        "status": payload.status.as_str(),
        "progress": {
            "answered": payload.progress.answered,
            "total": payload.progress.total,
        },
        "errors": payload.errors,
        "questions": questions,
    })
}

/// Render the payload as human-friendly text.
pub fn render_text(payload: &RenderPayload) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "Survey: {} ({})",
        payload.survey_title, payload.survey_id
    ));
    lines.push(format!("Your username for this survey: {}", payload.username));
    lines.push(format!(
        "Status: {} ({}/{})",
        payload.status.as_str(),
        payload.progress.answered,
        payload.progress.total
    ));

    if !payload.errors.is_empty() {
        lines.push("Errors:".to_string());
        for error in &payload.errors {
            lines.push(format!("  {}", error));
        }
    }

    for question in &payload.questions {
        let marker = if question.error { "!" } else { "ok" };
        lines.push(format!("{}. {} [{}]", question.number, question.text, marker));
        for hint in &question.hints {
            lines.push(format!("   {}", hint));
        }
        if let Some(message) = &question.message {
            lines.push(format!("   {}", message));
        }
        for (index, choice) in question.choices.iter().enumerate() {
            let mark = match (question.control, choice.selected) {
                (Control::Radio, true) => "(o)",
                (Control::Radio, false) => "( )",
                (_, true) => "[x]",
                (_, false) => "[ ]",
            };
            lines.push(format!("   {} {}. {}", mark, index + 1, choice.text));
        }
        if let Some(value) = &question.value {
            if value.is_empty() {
                lines.push("   > Short text answer here...".to_string());
            } else {
                lines.push(format!("   > {}", value));
            }
        }
    }

    lines.join("\n")
}

