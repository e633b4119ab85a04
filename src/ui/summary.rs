use super::Console;
use crate::report::{Report, Verdict};
use crate::utils::truncate_string;
use crossterm::style::Stylize;
use std::io::Write;

impl<W: Write> Console<W> {
    pub fn show_report(&mut self, report: &Report) {
        let text_width = self.width.saturating_sub(16).max(20);
        self.emit(|out| {
            writeln!(out)?;
            writeln!(out, "{}", "--- Quiz Report ---".bold())?;
            for line in &report.lines {
                let question = truncate_string(&line.question, text_width);
                match line.verdict {
                    Verdict::Correct => writeln!(
                        out,
                        "Question {}: {} {} (Your answer: {})",
                        line.number,
                        "Correct!".green(),
                        question,
                        line.user_answer
                    )?,
                    Verdict::Incorrect => writeln!(
                        out,
                        "Question {}: {} {} (Your answer: {}, Correct answer: {})",
                        line.number,
                        "Incorrect!".red(),
                        question,
                        line.user_answer,
                        line.correct_answer
                    )?,
                    Verdict::Unanswered => writeln!(
                        out,
                        "Question {}: {} {} (Correct answer: {})",
                        line.number,
                        "Unanswered".yellow(),
                        question,
                        line.correct_answer
                    )?,
                }
            }
            writeln!(out)?;
            writeln!(out, "{}", format!("Total Questions: {}", report.total).bold().white())?;
            writeln!(out, "{}", format!("✔ Correct Answers: {}", report.correct).bold().green())?;
            writeln!(out, "{}", format!("✘ Incorrect Answers: {}", report.incorrect).bold().red())?;
            writeln!(
                out,
                "{}",
                format!("❓ Unanswered Questions: {}", report.unanswered)
                    .bold()
                    .yellow()
            )
        });
    }
}
