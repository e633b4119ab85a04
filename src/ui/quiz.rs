use super::Console;
use crate::models::{AnswerOutcome, Question, QuestionType, ScoreCounter};
use crate::utils::pad_to_width;
use crossterm::cursor::MoveToColumn;
use crossterm::queue;
use crossterm::style::{Print, Stylize};
use crossterm::terminal::{Clear, ClearType};
use std::io::Write;

impl<W: Write> Console<W> {
    pub fn show_question(&mut self, number: usize, total: usize, question: &Question) {
        self.emit(|out| {
            writeln!(out)?;
            writeln!(
                out,
                "{}",
                format!("Question {}/{}:", number, total).bold()
            )?;
            writeln!(out, "{}", question.text)?;
            if question.question_type == QuestionType::MultipleChoice {
                for (i, choice) in question.choices.iter().enumerate() {
                    writeln!(out, "  {}. {}", i + 1, choice)?;
                }
            }
            Ok(())
        });
    }

    pub fn show_answer_prompt(&mut self, question: &Question) {
        let hint = match question.question_type {
            QuestionType::MultipleChoice => "Enter the serial number of your answer:",
            QuestionType::TrueFalse => "True or False (t/f):",
            QuestionType::FillInTheBlank => "Your answer:",
        };
        self.emit(|out| writeln!(out, "{}", hint.bold()));
    }

    /// Rewrites the countdown line in place.
    pub fn show_remaining(&mut self, seconds: u64) {
        self.emit(|out| {
            queue!(
                out,
                MoveToColumn(0),
                Clear(ClearType::CurrentLine),
                Print("Time remaining: "),
                Print(seconds.to_string().bold().yellow()),
                Print(" seconds")
            )
        });
    }

    pub fn show_invalid(&mut self, reason: &str) {
        self.emit(|out| {
            queue!(out, MoveToColumn(0), Clear(ClearType::CurrentLine))?;
            writeln!(out, "{}", reason)
        });
    }

    pub fn show_outcome(&mut self, outcome: &AnswerOutcome) {
        self.emit(|out| {
            queue!(out, MoveToColumn(0), Clear(ClearType::CurrentLine))?;
            match outcome {
                AnswerOutcome::Correct => writeln!(out, "{}", "Correct! 🎉".green()),
                AnswerOutcome::Incorrect {
                    correct_answer_shown,
                } => writeln!(
                    out,
                    "{} The correct answer was: {}",
                    "Incorrect! 😢".red(),
                    correct_answer_shown
                ),
                AnswerOutcome::Timeout => writeln!(out, "{}", "Time's up!".bold().red()),
                AnswerOutcome::Invalid { reason } => writeln!(out, "{}", reason),
            }
        });
    }

    pub fn show_scoreboard(&mut self, counter: &ScoreCounter) {
        let plain = format!("Scoreboard: ✔ {} ✘ {}", counter.correct, counter.wrong);
        let padding = pad_to_width(&plain, self.width).len() - plain.len();
        self.emit(|out| {
            writeln!(
                out,
                "Scoreboard: {} {}{}",
                format!("✔ {}", counter.correct).green(),
                format!("✘ {}", counter.wrong).red(),
                " ".repeat(padding)
            )
        });
    }
}
