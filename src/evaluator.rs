//! Type-specific answer checking.
//!
//! `evaluate` has no side effects: the same question and input always give
//! the same outcome, so it is also used to rebuild scores for the report.

use crate::models::{AnswerOutcome, Question, QuestionType};
use crate::utils::normalize_answer;

pub fn evaluate(question: &Question, raw_input: &str) -> AnswerOutcome {
    let answer = normalize_answer(raw_input);

    match question.question_type {
        QuestionType::TrueFalse => evaluate_true_false(question, &answer),
        QuestionType::MultipleChoice => evaluate_multiple_choice(question, &answer),
        QuestionType::FillInTheBlank => {
            if answer.is_empty() {
                // Blank submission is "no answer", recorded like a timeout.
                AnswerOutcome::Timeout
            } else {
                verdict(question, answer == normalize_answer(&question.correct_answer))
            }
        }
    }
}

/// The string persisted for a resolved attempt: the normalised input for a
/// real answer, the empty sentinel for a timeout.
pub fn recorded_answer(outcome: &AnswerOutcome, raw_input: &str) -> String {
    match outcome {
        AnswerOutcome::Correct | AnswerOutcome::Incorrect { .. } => normalize_answer(raw_input),
        AnswerOutcome::Timeout | AnswerOutcome::Invalid { .. } => String::new(),
    }
}

fn evaluate_true_false(question: &Question, answer: &str) -> AnswerOutcome {
    let Some(given) = true_false_value(answer, false) else {
        return AnswerOutcome::Invalid {
            reason: "Invalid input. Please enter T or F.".to_string(),
        };
    };

    // Stored answers are usually "t"/"f" but "true"/"false" shows up in banks too.
    let expected = true_false_value(&normalize_answer(&question.correct_answer), true);
    verdict(question, expected == Some(given))
}

fn true_false_value(token: &str, allow_words: bool) -> Option<bool> {
    match token {
        "t" => Some(true),
        "f" => Some(false),
        "true" if allow_words => Some(true),
        "false" if allow_words => Some(false),
        _ => None,
    }
}

fn evaluate_multiple_choice(question: &Question, answer: &str) -> AnswerOutcome {
    let count = question.choices.len();
    let index = match answer.parse::<usize>() {
        Ok(n) if (1..=count).contains(&n) => n,
        _ => {
            return AnswerOutcome::Invalid {
                reason: format!("Invalid input. Please enter a number between 1 and {}.", count),
            };
        }
    };

    verdict(question, question.choices[index - 1] == question.correct_answer)
}

fn verdict(question: &Question, is_correct: bool) -> AnswerOutcome {
    if is_correct {
        AnswerOutcome::Correct
    } else {
        AnswerOutcome::Incorrect {
            correct_answer_shown: question.correct_answer.clone(),
        }
    }
}
