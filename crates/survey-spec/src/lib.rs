#![allow(missing_docs)]

pub mod answers;
pub mod editor;
pub mod render;
pub mod renderer;
pub mod schema;
pub mod spec;
pub mod store;
pub mod validate;

pub use answers::{AnswerValue, Submission, UserAnswer, ValidationError};
pub use editor::{EditOutcome, QuestionList};
pub use render::{
    Control, RenderChoice, RenderPayload, RenderProgress, RenderQuestion, RenderStatus,
    build_render_payload, render_json_ui, render_text,
};
pub use renderer::{
    ClosedQuestionState, MAX_ANSWERS_WARNING, OPEN_ANSWER_MAX_LEN, OpenQuestionState,
    QuestionView, SelectionOutcome,
};
pub use schema::{answers_schema, survey_schema};
pub use spec::{
    Answer, AnswerId, Question, QuestionId, QuestionKind, SelectionMode, Survey, SurveyId,
    SurveySummary,
};
pub use store::{AnswerSlot, AnswerStore, StoreError};
pub use validate::validate;
