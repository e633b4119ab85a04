pub mod bank;
pub mod config;
pub mod db;
pub mod error;
pub mod evaluator;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod progress;
pub mod prompt;
pub mod report;
pub mod session;
pub mod timer;
pub mod ui;
pub mod utils;

// Re-exports for convenience
pub use bank::{QuestionBank, load_bank};
pub use config::{Config, StoreKind};
pub use db::SqliteStore;
pub use error::{BankLoadError, ProgressError, QuizError};
pub use evaluator::evaluate;
pub use models::{AnswerOutcome, Difficulty, ProgressSnapshot, Question, QuestionType, ScoreCounter};
pub use orchestrator::Quiz;
pub use progress::{InMemoryStore, JsonFileStore, ProgressStore};
pub use prompt::{InputPrompt, LineSource, PromptInput, ScriptedLines, StdinLines};
pub use report::Report;
pub use session::{QuestionSession, SessionResult, SessionState};
pub use timer::{Countdown, CountdownEvent, TimeLimit};
pub use ui::Console;
