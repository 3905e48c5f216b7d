use serde_json::Value;

use crate::answers::Submission;
use crate::spec::Survey;

/// JSON Schema describing the survey document format.
pub fn survey_schema() -> Value {
    schemars::schema_for!(Survey).to_value()
}

/// JSON Schema of a stored submission and the answers it carries.
pub fn answers_schema() -> Value {
    schemars::schema_for!(Submission).to_value()
}
