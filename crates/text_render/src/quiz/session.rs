//! Quiz session
//!
//! A cursor over an ordered list of questions with three answers each.
//! Navigation is bounds-checked and never leaves the list.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ConfigError;

/// Answers offered per question
pub const ANSWERS_PER_QUESTION: usize = 3;

/// Quiz errors
#[derive(Error, Debug)]
pub enum QuizError {
    /// A session needs at least one question
    #[error("Quiz has no questions")]
    EmptyQuestionList,

    /// Question file could not be loaded
    #[error("Quiz configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// One prompt with its answers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    /// Question text
    pub prompt: String,
    /// Answer choices in display order
    pub answers: [String; ANSWERS_PER_QUESTION],
}

impl QuizQuestion {
    /// Create a question
    pub fn new(prompt: impl Into<String>, answers: [&str; ANSWERS_PER_QUESTION]) -> Self {
        Self {
            prompt: prompt.into(),
            answers: answers.map(str::to_string),
        }
    }
}

/// Questions a session starts with when none are configured
pub fn default_questions() -> Vec<QuizQuestion> {
    vec![
        QuizQuestion::new("What is the capital of France?", ["Berlin", "Paris", "Madrid"]),
        QuizQuestion::new("How many sides does a triangle have?", ["Four", "Five", "Three"]),
        QuizQuestion::new(
            "What is the largest planet in our solar system?",
            ["Saturn", "Jupiter", "Neptune"],
        ),
        QuizQuestion::new("What is the chemical symbol for water?", ["CO2", "O2", "H2O"]),
        QuizQuestion::new(
            "Who wrote Romeo and Juliet?",
            ["Charles Dickens", "William Shakespeare", "Jane Austen"],
        ),
    ]
}

/// Position within a fixed question sequence
#[derive(Debug, Clone)]
pub struct QuizSession {
    questions: Vec<QuizQuestion>,
    current: usize,
}

impl QuizSession {
    /// Session over the built-in questions
    pub fn new() -> Self {
        Self {
            questions: default_questions(),
            current: 0,
        }
    }

    /// Session over `questions`, which must not be empty
    pub fn from_questions(questions: Vec<QuizQuestion>) -> Result<Self, QuizError> {
        if questions.is_empty() {
            return Err(QuizError::EmptyQuestionList);
        }
        Ok(Self {
            questions,
            current: 0,
        })
    }

    /// Append a question to the end of the sequence
    pub fn add_question(&mut self, prompt: impl Into<String>, answers: [String; ANSWERS_PER_QUESTION]) {
        self.questions.push(QuizQuestion {
            prompt: prompt.into(),
            answers,
        });
    }

    /// Current question
    pub fn current_question(&self) -> &QuizQuestion {
        &self.questions[self.current]
    }

    /// Current prompt
    pub fn current_prompt(&self) -> &str {
        &self.current_question().prompt
    }

    /// Answers of the current question
    pub fn current_answers(&self) -> &[String; ANSWERS_PER_QUESTION] {
        &self.current_question().answers
    }

    /// Answer `index` of the current question
    pub fn answer(&self, index: usize) -> Option<&str> {
        self.current_answers().get(index).map(String::as_str)
    }

    /// Zero-based position
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Number of questions
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    /// True when past the last question
    ///
    /// Navigation stops at the last question, so this only holds if the
    /// sequence is shorter than the cursor.
    pub fn is_finished(&self) -> bool {
        self.current >= self.questions.len()
    }

    /// Move to the next question; false when already at the last one
    pub fn advance(&mut self) -> bool {
        if self.current + 1 < self.questions.len() {
            self.current += 1;
            true
        } else {
            false
        }
    }

    /// Move to the previous question; false when already at the first one
    pub fn retreat(&mut self) -> bool {
        if self.current > 0 {
            self.current -= 1;
            true
        } else {
            false
        }
    }

    /// Go back to the first question
    pub fn reset(&mut self) {
        self.current = 0;
    }

    /// Jump to `index`; out-of-range indices leave the position unchanged
    pub fn jump_to(&mut self, index: usize) -> bool {
        if index < self.questions.len() {
            self.current = index;
            true
        } else {
            false
        }
    }
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_session() {
        let session = QuizSession::new();
        assert_eq!(session.total_questions(), 5);
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.current_prompt(), "What is the capital of France?");
        assert_eq!(session.answer(1), Some("Paris"));
        assert_eq!(session.answer(3), None);
        assert!(!session.is_finished());
    }

    #[test]
    fn test_advance_stops_at_last() {
        let mut session = QuizSession::new();
        for expected in 1..5 {
            assert!(session.advance());
            assert_eq!(session.current_index(), expected);
        }
        assert!(!session.advance());
        assert_eq!(session.current_index(), 4);
        assert_eq!(session.current_answers()[1], "William Shakespeare");
        assert!(!session.is_finished());
    }

    #[test]
    fn test_retreat_stops_at_first() {
        let mut session = QuizSession::new();
        assert!(!session.retreat());
        session.advance();
        assert!(session.retreat());
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn test_jump_and_reset() {
        let mut session = QuizSession::new();
        assert!(session.jump_to(3));
        assert_eq!(session.answer(2), Some("H2O"));

        assert!(!session.jump_to(5));
        assert_eq!(session.current_index(), 3);

        session.reset();
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn test_add_question_extends_sequence() {
        let mut session = QuizSession::new();
        session.add_question(
            "2 + 2?",
            ["3".to_string(), "4".to_string(), "5".to_string()],
        );
        assert_eq!(session.total_questions(), 6);
        assert!(session.jump_to(5));
        assert_eq!(session.current_prompt(), "2 + 2?");
    }

    #[test]
    fn test_empty_question_list_rejected() {
        assert!(matches!(
            QuizSession::from_questions(Vec::new()),
            Err(QuizError::EmptyQuestionList)
        ));

        let mut single =
            QuizSession::from_questions(vec![QuizQuestion::new("Q", ["a", "b", "c"])]).unwrap();
        assert!(!single.advance());
        assert!(!single.retreat());
    }
}
