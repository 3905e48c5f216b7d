use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub type QuestionId = u64;
pub type AnswerId = u64;

/// Kind of a question, encoded on the wire as `0` (closed) or `1` (open).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum QuestionKind {
    /// Answered by picking from a fixed list of answers.
    Closed,
    /// Answered with free text.
    Open,
}

impl QuestionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionKind::Closed => "closed",
            QuestionKind::Open => "open",
        }
    }
}

impl TryFrom<u8> for QuestionKind {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(QuestionKind::Closed),
            1 => Ok(QuestionKind::Open),
            other => Err(format!("unknown question type {other}, expected 0 or 1")),
        }
    }
}

impl From<QuestionKind> for u8 {
    fn from(kind: QuestionKind) -> Self {
        match kind {
            QuestionKind::Closed => 0,
            QuestionKind::Open => 1,
        }
    }
}

/// How the answers of a closed question are presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    /// Exactly one answer may be held; picking another replaces it.
    Radio,
    /// Independent checkboxes bounded by `max`.
    Checkbox,
}

/// One predefined answer of a closed question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Answer {
    pub id: AnswerId,
    #[serde(default)]
    pub text: String,
}

/// A single survey question.
///
/// For closed questions `min`/`max` bound the number of selected answers.
/// For open questions `min > 0` marks the answer as mandatory and `max` is unused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Question {
    pub id: QuestionId,
    #[serde(default)]
    pub text: String,
    #[serde(rename = "type")]
    #[schemars(with = "u8")]
    pub kind: QuestionKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub answers: Vec<Answer>,
    #[serde(default)]
    pub min: usize,
    #[serde(default = "default_max")]
    pub max: usize,
}

fn default_max() -> usize {
    1
}

impl Question {
    /// Selection mode for closed questions; exactly one mandatory answer means radio buttons.
    pub fn selection_mode(&self) -> SelectionMode {
        if self.min == 1 && self.max == 1 {
            SelectionMode::Radio
        } else {
            SelectionMode::Checkbox
        }
    }

    pub fn is_required(&self) -> bool {
        self.min > 0
    }

    pub fn answer(&self, id: AnswerId) -> Option<&Answer> {
        self.answers.iter().find(|answer| answer.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn kind_uses_numeric_wire_encoding() {
        let question: Question = serde_json::from_value(json!({
            "id": 11,
            "type": 1,
            "min": 1
        }))
        .expect("deserialize");
        assert_eq!(question.kind, QuestionKind::Open);
        assert_eq!(question.max, 1);
        assert!(question.text.is_empty());

        let value = serde_json::to_value(&question).expect("serialize");
        assert_eq!(value["type"], 1);
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let result: Result<Question, _> =
            serde_json::from_value(json!({ "id": 1, "type": 7 }));
        assert!(result.is_err());
    }

    #[test]
    fn single_answer_cap_selects_radio_mode() {
        let mut question = Question {
            id: 1,
            text: "Pick".into(),
            kind: QuestionKind::Closed,
            answers: vec![],
            min: 1,
            max: 1,
        };
        assert_eq!(question.selection_mode(), SelectionMode::Radio);
        question.max = 3;
        assert_eq!(question.selection_mode(), SelectionMode::Checkbox);
        question.min = 0;
        question.max = 1;
        assert_eq!(question.selection_mode(), SelectionMode::Checkbox);
    }
}
