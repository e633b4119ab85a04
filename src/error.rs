//! Error types for bank loading, progress persistence and the quiz run.

use thiserror::Error;

use crate::models::Difficulty;

/// Fatal: the quiz cannot start without a usable question bank.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BankLoadError {
    #[error("Error loading questions from file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Error loading questions from file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid JSON file structure: {0}")]
    Structure(String),
    #[error("Invalid JSON file structure: expected at least {min} questions, found {found}")]
    TooFewQuestions { min: usize, found: usize },
    #[error("Insufficient questions for the selected difficulty '{difficulty}': need {min}, found {found}")]
    InsufficientForDifficulty {
        difficulty: Difficulty,
        min: usize,
        found: usize,
    },
    #[error("Invalid question structure in the JSON file: question {index}: {reason}")]
    InvalidQuestion { index: usize, reason: String },
}

/// Non-fatal: persisted resumability may be lost, the run goes on.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressError {
    #[error("progress i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("progress serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("progress database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Errors that stop a quiz run.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error(transparent)]
    Bank(#[from] BankLoadError),
}
