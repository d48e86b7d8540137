//! Question set configuration

use serde::{Deserialize, Serialize};

use crate::config::Config;
use super::session::{default_questions, QuizError, QuizQuestion, QuizSession};

/// Questions loaded from a config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizConfig {
    /// Question sequence in order
    pub questions: Vec<QuizQuestion>,
}

impl QuizConfig {
    /// Start a session over the configured questions
    pub fn session(&self) -> Result<QuizSession, QuizError> {
        QuizSession::from_questions(self.questions.clone())
    }
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            questions: default_questions(),
        }
    }
}

impl Config for QuizConfig {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigFormat;

    #[test]
    fn test_toml_question_list() {
        let text = r#"
[[questions]]
prompt = "Largest ocean?"
answers = ["Atlantic", "Pacific", "Indian"]
"#;
        let config = QuizConfig::from_str_as(text, ConfigFormat::Toml).unwrap();
        let session = config.session().unwrap();
        assert_eq!(session.total_questions(), 1);
        assert_eq!(session.answer(1), Some("Pacific"));
    }

    #[test]
    fn test_ron_round_trip() {
        let config = QuizConfig::default();
        let text = config.to_string_as(ConfigFormat::Ron).unwrap();
        assert_eq!(QuizConfig::from_str_as(&text, ConfigFormat::Ron).unwrap(), config);
    }

    #[test]
    fn test_wrong_answer_count_rejected() {
        let text = r#"
[[questions]]
prompt = "Pick one"
answers = ["only", "two"]
"#;
        assert!(QuizConfig::from_str_as(text, ConfigFormat::Toml).is_err());
    }

    #[test]
    fn test_empty_list_fails_session() {
        let config = QuizConfig { questions: Vec::new() };
        assert!(matches!(config.session(), Err(QuizError::EmptyQuestionList)));
    }
}
