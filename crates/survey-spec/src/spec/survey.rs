use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::spec::question::{Question, QuestionId};

pub type SurveyId = u64;

/// A published survey, immutable for the duration of one form session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Survey {
    pub id: SurveyId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl Survey {
    pub fn summary(&self) -> SurveySummary {
        SurveySummary {
            id: self.id,
            title: if self.title.is_empty() {
                None
            } else {
                Some(self.title.clone())
            },
        }
    }

    pub fn question(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|question| question.id == id)
    }
}

/// Entry of the published-surveys listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SurveySummary {
    pub id: SurveyId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}
