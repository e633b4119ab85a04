use crate::bank::QuestionBank;
use crate::error::{BankLoadError, QuizError};
use crate::models::{Difficulty, ProgressSnapshot};
use crate::progress::ProgressStore;
use crate::prompt::{InputPrompt, LineSource};
use crate::report::Report;
use crate::session::QuestionSession;
use crate::timer::TimeLimit;
use crate::ui::Console;
use log::{error, info};
use rand::Rng;
use std::io::Write;

/// Drives a whole run: resume or build the question set, ask each
/// remaining question in order, persist after every answer, report, clear.
pub struct Quiz<P, S, W>
where
    P: ProgressStore,
    S: LineSource,
    W: Write,
{
    store: P,
    prompt: InputPrompt<S>,
    console: Console<W>,
    limit: TimeLimit,
    questions_per_run: usize,
    next_session_id: u64,
}

impl<P, S, W> Quiz<P, S, W>
where
    P: ProgressStore,
    S: LineSource,
    W: Write,
{
    pub fn new(store: P, prompt: InputPrompt<S>, console: Console<W>, limit: TimeLimit) -> Self {
        Self {
            store,
            prompt,
            console,
            limit,
            questions_per_run: crate::bank::DEFAULT_QUESTIONS_PER_RUN,
            next_session_id: 1,
        }
    }

    /// `0` asks every question of the chosen tier.
    pub fn with_questions_per_run(mut self, count: usize) -> Self {
        self.questions_per_run = count;
        self
    }

    /// The bank is only loaded when there is no matching saved progress.
    pub async fn run<F, R>(
        &mut self,
        difficulty: Difficulty,
        load_bank: F,
        rng: &mut R,
    ) -> Result<Report, QuizError>
    where
        F: FnOnce() -> Result<QuestionBank, BankLoadError>,
        R: Rng + ?Sized,
    {
        let mut snapshot = match self.store.load() {
            Some(saved) if saved.difficulty == difficulty => {
                info!(
                    "Resuming {} run at question {}/{}",
                    difficulty,
                    saved.answered_count() + 1,
                    saved.questions.len()
                );
                self.console
                    .show_resume(saved.answered_count(), saved.questions.len());
                saved
            }
            saved => {
                if let Some(saved) = saved {
                    info!(
                        "Saved progress is for {}, starting a fresh {} run",
                        saved.difficulty, difficulty
                    );
                }
                let bank = load_bank()?;
                let questions = bank.question_set(difficulty, self.questions_per_run, rng)?;
                self.console.show_loaded(
                    difficulty,
                    questions.len(),
                    self.limit.seconds().saturating_mul(questions.len() as u64),
                );
                ProgressSnapshot::new(difficulty, questions)
            }
        };

        let total = snapshot.questions.len();
        while let Some((index, question)) = snapshot.next_question() {
            let question = question.clone();
            let mut session = QuestionSession::new(self.next_session_id, &question, self.limit)
                .with_position(index + 1, total);
            self.next_session_id += 1;

            let result = session
                .run(&mut self.prompt, &mut self.console, &mut snapshot.counter)
                .await;
            snapshot.push_answer(result.recorded_answer);

            if let Err(e) = self.store.save(&snapshot) {
                error!("Saving progress after question {} failed: {}", index + 1, e);
                self.console
                    .show_error(&format!("Could not save progress: {}", e));
            }
        }

        let report = Report::from_answers(&snapshot.questions, &snapshot.user_answers);
        info!(
            "Run finished: {}/{} correct, {} unanswered",
            report.correct, report.total, report.unanswered
        );
        self.console.show_report(&report);

        if let Err(e) = self.store.clear() {
            error!("Clearing saved progress failed: {}", e);
        }

        Ok(report)
    }

    pub fn store(&self) -> &P {
        &self.store
    }

    pub fn console(&self) -> &Console<W> {
        &self.console
    }

    pub fn prompt(&self) -> &InputPrompt<S> {
        &self.prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Question, QuestionType, ScoreCounter};
    use crate::progress::InMemoryStore;
    use crate::prompt::ScriptedLines;
    use crate::ui::rendered;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::cell::Cell;

    fn tf(i: usize) -> Question {
        Question {
            text: format!("Statement {} is true.", i),
            question_type: QuestionType::TrueFalse,
            choices: vec![],
            correct_answer: "t".to_string(),
            difficulty: Difficulty::Starter,
        }
    }

    fn bank() -> QuestionBank {
        QuestionBank::new((0..6).map(tf).collect())
    }

    fn quiz(
        store: InMemoryStore,
        script: ScriptedLines,
    ) -> Quiz<InMemoryStore, ScriptedLines, Vec<u8>> {
        Quiz::new(
            store,
            InputPrompt::new(script),
            Console::new(Vec::new(), 80),
            TimeLimit::from_configured(5),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_fresh_run_saves_after_each_answer_and_clears() {
        let script = ScriptedLines::new()
            .line("t")
            .line("f")
            .line("t")
            .line("t")
            .line("t");
        let mut quiz = quiz(InMemoryStore::new(), script);

        let report = quiz
            .run(Difficulty::Starter, || Ok(bank()), &mut StdRng::seed_from_u64(1))
            .await
            .unwrap();

        assert_eq!(report.total, 5);
        assert_eq!(report.correct, 4);
        assert_eq!(report.incorrect, 1);
        assert_eq!(quiz.store().saves, 5);
        assert!(quiz.store().is_empty());
        assert!(rendered(quiz.console()).contains("--- Quiz Report ---"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_resumes_at_first_unanswered_without_loading_bank() {
        let mut saved = ProgressSnapshot::new(Difficulty::Starter, (0..4).map(tf).collect());
        saved.push_answer("t".to_string());
        saved.push_answer(String::new());
        saved.counter = ScoreCounter { correct: 1, wrong: 1 };
        let store = InMemoryStore::with_snapshot(&saved).unwrap();

        let script = ScriptedLines::new().line("t").line("f");
        let mut quiz = quiz(store, script);

        let report = quiz
            .run(
                Difficulty::Starter,
                || panic!("bank must not be loaded when resuming"),
                &mut StdRng::seed_from_u64(1),
            )
            .await
            .unwrap();

        assert_eq!(report.total, 4);
        assert_eq!(report.correct, 2);
        assert_eq!(report.unanswered, 1);
        assert_eq!(quiz.store().saves, 2);
        let output = rendered(quiz.console());
        assert!(output.contains("Resuming quiz"));
        assert!(output.contains("Question 3/4:"));
        assert!(!output.contains("Question 1/4:"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_other_difficulty_snapshot_starts_fresh() {
        let saved = ProgressSnapshot::new(Difficulty::Advanced, (0..5).map(tf).collect());
        let store = InMemoryStore::with_snapshot(&saved).unwrap();
        let loads = Cell::new(0);

        let script = ScriptedLines::new().line("t").line("t").line("t").line("t").line("t");
        let mut quiz = quiz(store, script);
        let report = quiz
            .run(
                Difficulty::Starter,
                || {
                    loads.set(loads.get() + 1);
                    Ok(bank())
                },
                &mut StdRng::seed_from_u64(9),
            )
            .await
            .unwrap();

        assert_eq!(loads.get(), 1);
        assert_eq!(report.correct, 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_completed_snapshot_goes_straight_to_report() {
        let mut saved = ProgressSnapshot::new(Difficulty::Starter, (0..2).map(tf).collect());
        saved.push_answer("t".to_string());
        saved.push_answer("f".to_string());
        let store = InMemoryStore::with_snapshot(&saved).unwrap();

        let mut quiz = quiz(store, ScriptedLines::new());
        let report = quiz
            .run(
                Difficulty::Starter,
                || panic!("nothing left to ask"),
                &mut StdRng::seed_from_u64(1),
            )
            .await
            .unwrap();

        assert_eq!(report.total, 2);
        assert_eq!(report.correct, 1);
        assert_eq!(quiz.store().saves, 0);
        assert!(quiz.store().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_bank_error_aborts_before_any_session() {
        let mut quiz = quiz(InMemoryStore::new(), ScriptedLines::new().line("t"));
        let err = quiz
            .run(
                Difficulty::Advanced,
                || Ok(bank()),
                &mut StdRng::seed_from_u64(1),
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            QuizError::Bank(BankLoadError::InsufficientForDifficulty { .. })
        ));
        assert!(!rendered(quiz.console()).contains("Question 1/"));
        assert_eq!(quiz.prompt().source().remaining(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_huge_time_limit_does_not_overflow_total_time() {
        let script = ScriptedLines::new().line("t").line("t").line("t").line("t").line("t");
        let mut quiz = Quiz::new(
            InMemoryStore::new(),
            InputPrompt::new(script),
            Console::new(Vec::new(), 80),
            TimeLimit::from_configured(u64::MAX),
        );

        let report = quiz
            .run(Difficulty::Starter, || Ok(bank()), &mut StdRng::seed_from_u64(3))
            .await
            .unwrap();

        assert_eq!(report.correct, 5);
        assert!(rendered(quiz.console()).contains(&format!("Total quiz time: {} seconds", u64::MAX)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_failure_keeps_report_and_snapshot() {
        let mut store = InMemoryStore::new();
        store.fail_clears = true;
        let script = ScriptedLines::new().line("t").line("f").line("t").line("t").line("t");
        let mut quiz = quiz(store, script);

        let report = quiz
            .run(Difficulty::Starter, || Ok(bank()), &mut StdRng::seed_from_u64(4))
            .await
            .unwrap();
        assert_eq!(report.correct, 4);

        let left = quiz.store().peek().unwrap();
        assert!(left.is_complete());
        assert_eq!(left.counter, ScoreCounter { correct: 4, wrong: 1 });

        let Quiz { mut store, .. } = quiz;
        store.fail_clears = false;
        let mut again = Quiz::new(
            store,
            InputPrompt::new(ScriptedLines::new()),
            Console::new(Vec::new(), 80),
            TimeLimit::from_configured(5),
        );
        let report = again
            .run(
                Difficulty::Starter,
                || panic!("nothing left to ask"),
                &mut StdRng::seed_from_u64(4),
            )
            .await
            .unwrap();

        assert_eq!(report.correct, 4);
        assert_eq!(report.total, 5);
        assert!(!rendered(again.console()).contains("Question 1/"));
        assert!(again.store().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_save_failure_does_not_stop_the_run() {
        let mut store = InMemoryStore::new();
        store.fail_saves = true;
        let script = ScriptedLines::new().line("t").line("t").line("t").line("t").line("t");
        let mut quiz = quiz(store, script);

        let report = quiz
            .run(Difficulty::Starter, || Ok(bank()), &mut StdRng::seed_from_u64(2))
            .await
            .unwrap();

        assert_eq!(report.correct, 5);
        assert!(rendered(quiz.console()).contains("Could not save progress"));
    }
}
