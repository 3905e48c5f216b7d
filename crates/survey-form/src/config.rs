use serde::{Deserialize, Serialize};
use survey_spec::OPEN_ANSWER_MAX_LEN;

use crate::error::ConfigError;

pub const DEFAULT_USERNAME: &str = "nameless";

/// Tunables of a form session. Missing fields fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    /// Name used when the respondent skips the username prompt.
    pub default_username: String,
    /// Character cap for open answers.
    pub open_answer_max_len: usize,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            default_username: DEFAULT_USERNAME.to_string(),
            open_answer_max_len: OPEN_ANSWER_MAX_LEN,
        }
    }
}

impl FormConfig {
    pub fn from_json(config_json: &str) -> Result<Self, ConfigError> {
        let config: FormConfig = if config_json.trim().is_empty() {
            FormConfig::default()
        } else {
            serde_json::from_str(config_json).map_err(ConfigError::Parse)?
        };
        config.check()?;
        Ok(config)
    }

    fn check(&self) -> Result<(), ConfigError> {
        if self.default_username.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "default_username cannot be blank".into(),
            ));
        }
        if self.open_answer_max_len == 0 {
            return Err(ConfigError::Invalid(
                "open_answer_max_len must be positive".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = FormConfig::from_json("  ").expect("config");
        assert_eq!(config.default_username, "nameless");
        assert_eq!(config.open_answer_max_len, 200);
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let config = FormConfig::from_json(r#"{"default_username": "guest"}"#).expect("config");
        assert_eq!(config.default_username, "guest");
        assert_eq!(config.open_answer_max_len, 200);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            FormConfig::from_json(r#"{"open_answer_max_len": 0}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            FormConfig::from_json("{not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
