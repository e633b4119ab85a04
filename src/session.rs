//! One question, one countdown, one resolved outcome.
//!
//! The countdown and the input prompt are polled from the same task with
//! `tokio::select!`. Whichever branch completes first wins; the loser's
//! future is dropped before the winning branch is handled, so no tick can
//! be rendered after an answer has been accepted.

use crate::evaluator::{evaluate, recorded_answer};
use crate::models::{AnswerOutcome, Question, ScoreCounter};
use crate::prompt::{InputPrompt, LineSource, PromptInput};
use crate::timer::{Countdown, CountdownEvent, TimeLimit};
use crate::ui::Console;
use log::{debug, info, warn};
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Presenting,
    AwaitingAnswer,
    Scoring,
    Expired,
    Resolved,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionResult {
    pub outcome: AnswerOutcome,
    /// Normalised answer text, or `""` when nothing usable was given.
    pub recorded_answer: String,
}

pub struct QuestionSession<'q> {
    id: u64,
    question: &'q Question,
    limit: TimeLimit,
    number: usize,
    total: usize,
    state: SessionState,
    invalid_attempts: u32,
    result: Option<SessionResult>,
}

impl<'q> QuestionSession<'q> {
    pub fn new(id: u64, question: &'q Question, limit: TimeLimit) -> Self {
        Self {
            id,
            question,
            limit,
            number: 1,
            total: 1,
            state: SessionState::Presenting,
            invalid_attempts: 0,
            result: None,
        }
    }

    /// 1-based position shown in the question header.
    pub fn with_position(mut self, number: usize, total: usize) -> Self {
        self.number = number;
        self.total = total;
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn invalid_attempts(&self) -> u32 {
        self.invalid_attempts
    }

    pub fn result(&self) -> Option<&SessionResult> {
        self.result.as_ref()
    }

    /// Runs the question to its single resolved outcome and scores it.
    /// Calling it again returns the stored result without re-scoring.
    pub async fn run<S, W>(
        &mut self,
        prompt: &mut InputPrompt<S>,
        console: &mut Console<W>,
        counter: &mut ScoreCounter,
    ) -> SessionResult
    where
        S: LineSource,
        W: Write,
    {
        if let Some(result) = &self.result {
            warn!("Session {} already resolved; ignoring rerun", self.id);
            return result.clone();
        }

        console.show_question(self.number, self.total, self.question);
        prompt.discard_stale();
        console.show_answer_prompt(self.question);

        self.transition(SessionState::AwaitingAnswer);
        let mut countdown = Countdown::start(self.limit);
        console.show_remaining(self.limit.seconds());

        let (outcome, raw) = loop {
            tokio::select! {
                biased;

                input = prompt.prompt() => {
                    let line = match input {
                        PromptInput::Line(line) => line,
                        PromptInput::Unavailable => {
                            countdown.cancel();
                            self.transition(SessionState::Expired);
                            break (AnswerOutcome::Timeout, String::new());
                        }
                    };

                    match evaluate(self.question, &line) {
                        AnswerOutcome::Invalid { reason } => {
                            self.invalid_attempts += 1;
                            prompt.retry(&reason);
                            console.show_invalid(&reason);
                        }
                        outcome => {
                            countdown.cancel();
                            self.transition(SessionState::Scoring);
                            if outcome == AnswerOutcome::Timeout {
                                console.message("No answer provided.");
                            }
                            break (outcome, line);
                        }
                    }
                }

                event = countdown.next_event() => match event {
                    CountdownEvent::Tick { remaining } => console.show_remaining(remaining),
                    CountdownEvent::Expired => {
                        self.transition(SessionState::Expired);
                        break (AnswerOutcome::Timeout, String::new());
                    }
                },
            }
        };

        counter.record(&outcome);
        let result = SessionResult {
            recorded_answer: recorded_answer(&outcome, &raw),
            outcome,
        };
        self.transition(SessionState::Resolved);
        info!("Session {} resolved: {:?}", self.id, result.outcome);

        console.show_outcome(&result.outcome);
        console.show_scoreboard(counter);

        self.result = Some(result.clone());
        result
    }

    fn transition(&mut self, next: SessionState) {
        debug!("Session {}: {:?} -> {:?}", self.id, self.state, next);
        self.state = next;
    }
}
