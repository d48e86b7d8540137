//! Quiz question tracking

pub mod config;
pub mod session;

pub use config::QuizConfig;
pub use session::{default_questions, QuizError, QuizQuestion, QuizSession, ANSWERS_PER_QUESTION};
