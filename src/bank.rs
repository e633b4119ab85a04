use crate::error::BankLoadError;
use crate::models::{Difficulty, Question, QuestionType};
use log::{debug, info};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const MIN_TOTAL_QUESTIONS: usize = 5;
pub const MIN_PER_DIFFICULTY: usize = 5;
pub const MIN_CHOICES: usize = 4;
pub const DEFAULT_QUESTIONS_PER_RUN: usize = 5;

/// Raw record as it appears in the bank file. Kept loose so a bad record
/// produces a message naming it instead of a bare serde error.
#[derive(Debug, Deserialize)]
struct RawQuestion {
    #[serde(default)]
    text: Option<String>,
    #[serde(default, rename = "type")]
    question_type: Option<String>,
    #[serde(default)]
    choices: Option<Vec<String>>,
    #[serde(default)]
    correct_answer: Option<String>,
    #[serde(default)]
    difficulty: Option<String>,
}

#[derive(Debug, Clone)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn count_for(&self, difficulty: Difficulty) -> usize {
        self.questions
            .iter()
            .filter(|q| q.difficulty == difficulty)
            .count()
    }

    /// Builds the ordered question set for one run: filter by tier,
    /// shuffle, keep the first `limit` (`0` keeps all of them).
    pub fn question_set<R: Rng + ?Sized>(
        &self,
        difficulty: Difficulty,
        limit: usize,
        rng: &mut R,
    ) -> Result<Vec<Question>, BankLoadError> {
        let mut selected: Vec<Question> = self
            .questions
            .iter()
            .filter(|q| q.difficulty == difficulty)
            .cloned()
            .collect();

        if selected.len() < MIN_PER_DIFFICULTY {
            return Err(BankLoadError::InsufficientForDifficulty {
                difficulty,
                min: MIN_PER_DIFFICULTY,
                found: selected.len(),
            });
        }

        selected.shuffle(rng);
        if limit > 0 {
            selected.truncate(limit);
        }

        debug!(
            "Built {} question set with {} questions",
            difficulty,
            selected.len()
        );
        Ok(selected)
    }
}

pub fn load_bank(path: &Path) -> Result<QuestionBank, BankLoadError> {
    let content = fs::read_to_string(path)?;
    let bank = parse_bank(&content)?;
    info!(
        "Loaded {} questions from {}",
        bank.questions.len(),
        path.display()
    );
    Ok(bank)
}

pub fn parse_bank(content: &str) -> Result<QuestionBank, BankLoadError> {
    let value: serde_json::Value = serde_json::from_str(content)?;
    let entries = value
        .get("questions")
        .and_then(|q| q.as_array())
        .ok_or_else(|| BankLoadError::Structure("missing 'questions' array".to_string()))?;

    if entries.len() < MIN_TOTAL_QUESTIONS {
        return Err(BankLoadError::TooFewQuestions {
            min: MIN_TOTAL_QUESTIONS,
            found: entries.len(),
        });
    }

    let questions = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let raw: RawQuestion = serde_json::from_value(entry.clone()).map_err(|e| {
                BankLoadError::InvalidQuestion {
                    index,
                    reason: e.to_string(),
                }
            })?;
            validate_question(index, raw)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(QuestionBank::new(questions))
}

fn validate_question(index: usize, raw: RawQuestion) -> Result<Question, BankLoadError> {
    let invalid = |reason: &str| BankLoadError::InvalidQuestion {
        index,
        reason: reason.to_string(),
    };

    let text = non_empty(raw.text).ok_or_else(|| invalid("missing text"))?;
    let correct_answer =
        non_empty(raw.correct_answer).ok_or_else(|| invalid("missing correct_answer"))?;
    let difficulty = match non_empty(raw.difficulty).as_deref() {
        Some("starter") => Difficulty::Starter,
        Some("advanced") => Difficulty::Advanced,
        Some(other) => return Err(invalid(&format!("unknown difficulty '{}'", other))),
        None => return Err(invalid("missing difficulty")),
    };

    let question_type = match non_empty(raw.question_type).as_deref() {
        Some("multiple_choice") => QuestionType::MultipleChoice,
        Some("true_false") => QuestionType::TrueFalse,
        Some("fill_in_the_blank") => QuestionType::FillInTheBlank,
        Some(other) => return Err(invalid(&format!("unknown type '{}'", other))),
        None => return Err(invalid("missing type")),
    };

    let choices = match question_type {
        QuestionType::MultipleChoice => {
            let choices = raw.choices.unwrap_or_default();
            if choices.len() < MIN_CHOICES {
                return Err(invalid(&format!(
                    "multiple_choice needs at least {} choices, found {}",
                    MIN_CHOICES,
                    choices.len()
                )));
            }
            if !choices.contains(&correct_answer) {
                return Err(invalid("correct_answer is not one of the choices"));
            }
            choices
        }
        _ => Vec::new(),
    };

    Ok(Question {
        text,
        question_type,
        choices,
        correct_answer,
        difficulty,
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
