use super::Console;
use crate::models::Difficulty;
use crossterm::style::Stylize;
use std::io::Write;

impl<W: Write> Console<W> {
    pub fn show_difficulty_menu(&mut self) {
        self.emit(|out| {
            writeln!(out, "{}", "Choose the difficulty level:".bold())?;
            for (i, difficulty) in Difficulty::ALL.iter().enumerate() {
                writeln!(out, "  {}. {}", i + 1, difficulty)?;
            }
            Ok(())
        });
    }

    pub fn show_unknown_difficulty(&mut self, input: &str) {
        self.emit(|out| {
            writeln!(
                out,
                "{}",
                format!("'{}' is not a difficulty. Enter starter or advanced.", input.trim()).red()
            )
        });
    }

    pub fn show_loaded(&mut self, difficulty: Difficulty, count: usize, total_seconds: u64) {
        self.emit(|out| {
            writeln!(
                out,
                "{} {} questions loaded successfully",
                "✔".green(),
                difficulty
            )?;
            writeln!(
                out,
                "Total quiz time: {} seconds for {} questions.",
                total_seconds, count
            )
        });
    }

    pub fn show_resume(&mut self, answered: usize, total: usize) {
        self.emit(|out| {
            writeln!(
                out,
                "{}",
                format!(
                    "Resuming quiz from the last saved progress ({}/{} answered).",
                    answered, total
                )
                .yellow()
            )
        });
    }

    pub fn show_error(&mut self, message: &str) {
        self.emit(|out| writeln!(out, "{}", message.red()));
    }
}
