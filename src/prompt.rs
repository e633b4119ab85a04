use async_trait::async_trait;
use log::{debug, warn};
use std::collections::VecDeque;
use std::io::{self, BufRead};
use std::thread;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::time::{Instant, sleep_until};

/// Source of answer lines. `Ok(None)` means the stream is closed.
#[async_trait]
pub trait LineSource: Send {
    /// Must be cancel-safe: a dropped call loses no line.
    async fn next_line(&mut self) -> io::Result<Option<String>>;

    /// Throws away lines that arrived while nobody was asking. Returns how many.
    fn discard_pending(&mut self) -> usize {
        0
    }
}

/// Lines from the process stdin, read on a dedicated thread so a blocked
/// read never holds up the runtime.
#[derive(Debug)]
pub struct StdinLines {
    rx: UnboundedReceiver<io::Result<String>>,
    /// Read failure met while discarding; reported by the next `next_line`.
    failed: Option<io::Error>,
}

impl StdinLines {
    pub fn spawn() -> io::Result<Self> {
        let (tx, rx) = mpsc::unbounded_channel();
        spawn_stdin_reader(tx)?;
        Ok(Self::from_receiver(rx))
    }

    pub fn from_receiver(rx: UnboundedReceiver<io::Result<String>>) -> Self {
        Self { rx, failed: None }
    }
}

fn spawn_stdin_reader(tx: UnboundedSender<io::Result<String>>) -> io::Result<()> {
    thread::Builder::new()
        .name("timed-quiz::stdin".to_string())
        .spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                let failed = line.is_err();
                if tx.send(line).is_err() || failed {
                    break;
                }
            }
            debug!("Stdin reader exiting");
        })?;
    Ok(())
}

#[async_trait]
impl LineSource for StdinLines {
    async fn next_line(&mut self) -> io::Result<Option<String>> {
        if let Some(e) = self.failed.take() {
            return Err(e);
        }
        match self.rx.recv().await {
            Some(Ok(line)) => Ok(Some(line)),
            Some(Err(e)) => Err(e),
            None => Ok(None),
        }
    }

    fn discard_pending(&mut self) -> usize {
        let mut discarded = 0;
        while let Ok(line) = self.rx.try_recv() {
            match line {
                Ok(_) => discarded += 1,
                Err(e) => {
                    debug!("Stdin failed while discarding late input: {}", e);
                    self.failed = Some(e);
                    break;
                }
            }
        }
        discarded
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptStep {
    Line(String),
    Fail,
    Close,
}

/// Replays a fixed list of lines, each after a delay measured from when it
/// was first waited on. Once the script runs out it behaves like a user who
/// never types again.
#[derive(Debug, Default)]
pub struct ScriptedLines {
    steps: VecDeque<(Duration, ScriptStep)>,
    ready_at: Option<Instant>,
}

impl ScriptedLines {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line_after(mut self, delay: Duration, line: &str) -> Self {
        self.steps
            .push_back((delay, ScriptStep::Line(line.to_string())));
        self
    }

    pub fn line(self, line: &str) -> Self {
        self.line_after(Duration::ZERO, line)
    }

    pub fn fail_after(mut self, delay: Duration) -> Self {
        self.steps.push_back((delay, ScriptStep::Fail));
        self
    }

    pub fn close_after(mut self, delay: Duration) -> Self {
        self.steps.push_back((delay, ScriptStep::Close));
        self
    }

    pub fn remaining(&self) -> usize {
        self.steps.len()
    }
}

#[async_trait]
impl LineSource for ScriptedLines {
    async fn next_line(&mut self) -> io::Result<Option<String>> {
        let Some(delay) = self.steps.front().map(|(delay, _)| *delay) else {
            return std::future::pending().await;
        };

        let deadline = *self.ready_at.get_or_insert_with(|| Instant::now() + delay);
        sleep_until(deadline).await;
        self.ready_at = None;

        match self.steps.pop_front() {
            Some((_, ScriptStep::Line(line))) => Ok(Some(line)),
            Some((_, ScriptStep::Fail)) => Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "scripted input failure",
            )),
            Some((_, ScriptStep::Close)) | None => Ok(None),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptInput {
    Line(String),
    /// Stream failed or closed. Treated like a timeout by the session.
    Unavailable,
}

impl PromptInput {
    /// The answer text, or the empty-string sentinel when nothing can be read.
    pub fn text(&self) -> &str {
        match self {
            PromptInput::Line(line) => line,
            PromptInput::Unavailable => "",
        }
    }
}

/// Single-line answer collector on top of a `LineSource`.
///
/// The session calls `prompt` again after each rejected attempt; the
/// countdown is not involved here.
pub struct InputPrompt<S: LineSource> {
    source: S,
    closed: bool,
}

impl<S: LineSource> InputPrompt<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            closed: false,
        }
    }

    pub async fn prompt(&mut self) -> PromptInput {
        if self.closed {
            return PromptInput::Unavailable;
        }

        match self.source.next_line().await {
            Ok(Some(line)) => PromptInput::Line(line),
            Ok(None) => {
                warn!("Input stream closed; remaining questions count as unanswered");
                self.closed = true;
                PromptInput::Unavailable
            }
            Err(e) => {
                warn!("Input stream failed: {}", e);
                self.closed = true;
                PromptInput::Unavailable
            }
        }
    }

    /// Logs and re-arms after a rejected attempt.
    pub fn retry(&self, reason: &str) {
        debug!("Re-prompting: {}", reason);
    }

    pub fn discard_stale(&mut self) -> usize {
        let discarded = self.source.discard_pending();
        if discarded > 0 {
            debug!("Discarded {} late input line(s)", discarded);
        }
        discarded
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}
