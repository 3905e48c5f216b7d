use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::spec::{AnswerId, Question, QuestionId, QuestionKind, SurveyId};

/// Value recorded for one question.
///
/// Serialised untagged: a list of answer ids for closed questions, a string for open ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum AnswerValue {
    Choices(Vec<AnswerId>),
    Text(String),
}

impl AnswerValue {
    pub fn kind(&self) -> QuestionKind {
        match self {
            AnswerValue::Choices(_) => QuestionKind::Closed,
            AnswerValue::Text(_) => QuestionKind::Open,
        }
    }
}

/// The respondent's answer to one question; `values` stays `None` until the
/// matching renderer publishes something.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct UserAnswer {
    pub id: QuestionId,
    #[serde(rename = "type")]
    #[schemars(with = "u8")]
    pub kind: QuestionKind,
    pub values: Option<AnswerValue>,
}

impl UserAnswer {
    pub fn empty(question: &Question) -> Self {
        Self {
            id: question.id,
            kind: question.kind,
            values: None,
        }
    }

    /// Number of selected answers; zero for anything that is not a choice list.
    pub fn selected_count(&self) -> usize {
        match &self.values {
            Some(AnswerValue::Choices(ids)) => ids.len(),
            _ => 0,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match &self.values {
            Some(AnswerValue::Text(text)) => Some(text.as_str()),
            _ => None,
        }
    }

    /// True when nothing usable has been recorded.
    pub fn is_blank(&self) -> bool {
        match &self.values {
            None => true,
            Some(AnswerValue::Choices(ids)) => ids.is_empty(),
            Some(AnswerValue::Text(text)) => text.is_empty(),
        }
    }
}

/// One problem found by [`crate::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Zero-based position of the question in the survey.
    pub index: usize,
    pub question_id: QuestionId,
    pub message: String,
    pub code: String,
}

/// Payload handed to the submission collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Submission {
    pub survey_id: SurveyId,
    pub username: String,
    pub answers: Vec<UserAnswer>,
}

impl Submission {
    pub fn to_cbor(&self) -> Result<Vec<u8>, serde_cbor::Error> {
        serde_cbor::to_vec(self)
    }

    pub fn from_cbor(bytes: &[u8]) -> Result<Self, serde_cbor::Error> {
        serde_cbor::from_slice(bytes)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn values_serialize_untagged() {
        let closed = UserAnswer {
            id: 10,
            kind: QuestionKind::Closed,
            values: Some(AnswerValue::Choices(vec![101])),
        };
        let open = UserAnswer {
            id: 11,
            kind: QuestionKind::Open,
            values: Some(AnswerValue::Text("hello".into())),
        };
        let value = serde_json::to_value([&closed, &open]).expect("serialize");
        assert_eq!(
            value,
            json!([
                { "id": 10, "type": 0, "values": [101] },
                { "id": 11, "type": 1, "values": "hello" }
            ])
        );
    }

    #[test]
    fn unset_values_are_null_and_blank() {
        let answer: UserAnswer =
            serde_json::from_value(json!({ "id": 3, "type": 1, "values": null }))
                .expect("deserialize");
        assert!(answer.is_blank());
        assert_eq!(answer.selected_count(), 0);
        assert_eq!(answer.text(), None);
    }

    #[test]
    fn submission_survives_cbor() {
        let submission = Submission {
            survey_id: 1,
            username: "nameless".into(),
            answers: vec![UserAnswer {
                id: 10,
                kind: QuestionKind::Closed,
                values: Some(AnswerValue::Choices(vec![100, 101])),
            }],
        };
        let bytes = submission.to_cbor().expect("encode");
        assert_eq!(Submission::from_cbor(&bytes).expect("decode"), submission);
    }
}
