pub mod question;
pub mod survey;

pub use question::{Answer, AnswerId, Question, QuestionId, QuestionKind, SelectionMode};
pub use survey::{Survey, SurveyId, SurveySummary};
