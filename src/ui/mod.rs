//! Line-oriented terminal rendering.
//!
//! Everything the quiz prints goes through `Console`, which is generic over
//! the writer so tests can render into a `Vec<u8>`. Render failures are
//! logged and swallowed: a broken terminal must not end a quiz.

mod menu;
mod quiz;
mod summary;

use log::warn;
use std::io::{self, Write};

pub const DEFAULT_WIDTH: usize = 80;

pub struct Console<W: Write> {
    out: W,
    width: usize,
}

impl Console<io::Stdout> {
    pub fn stdout() -> Self {
        let width = crossterm::terminal::size()
            .map(|(cols, _)| cols as usize)
            .unwrap_or(DEFAULT_WIDTH);
        Self::new(io::stdout(), width)
    }
}

impl<W: Write> Console<W> {
    pub fn new(out: W, width: usize) -> Self {
        Self { out, width }
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    pub fn message(&mut self, text: &str) {
        self.emit(|out| writeln!(out, "{}", text));
    }

    fn emit<F>(&mut self, render: F)
    where
        F: FnOnce(&mut W) -> io::Result<()>,
    {
        if let Err(e) = render(&mut self.out).and_then(|_| self.out.flush()) {
            warn!("Terminal write failed: {}", e);
        }
    }
}

#[cfg(test)]
pub(crate) fn rendered(console: &Console<Vec<u8>>) -> String {
    String::from_utf8_lossy(console.writer()).into_owned()
}
