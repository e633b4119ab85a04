use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    MultipleChoice,
    TrueFalse,
    FillInTheBlank,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Starter,
    Advanced,
}

impl Difficulty {
    pub const ALL: [Difficulty; 2] = [Difficulty::Starter, Difficulty::Advanced];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Starter => "starter",
            Difficulty::Advanced => "advanced",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    /// Accepts the tier name (any case) or its menu number.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "starter" | "1" => Ok(Difficulty::Starter),
            "advanced" | "2" => Ok(Difficulty::Advanced),
            other => Err(format!("unknown difficulty '{}'", other)),
        }
    }
}

/// One question as stored in the bank and in the progress snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub text: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<String>,
    pub correct_answer: String,
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerOutcome {
    Correct,
    Incorrect { correct_answer_shown: String },
    /// Not scored; the session asks again.
    Invalid { reason: String },
    Timeout,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreCounter {
    pub correct: u32,
    pub wrong: u32,
}

impl ScoreCounter {
    /// Counts a resolved outcome. `Invalid` is ignored.
    pub fn record(&mut self, outcome: &AnswerOutcome) {
        match outcome {
            AnswerOutcome::Correct => self.correct += 1,
            AnswerOutcome::Incorrect { .. } | AnswerOutcome::Timeout => self.wrong += 1,
            AnswerOutcome::Invalid { .. } => {}
        }
    }

    pub fn total(&self) -> u32 {
        self.correct + self.wrong
    }
}

/// Persisted state of an unfinished run.
///
/// `user_answers[i] == None` means question `i` was never attempted;
/// `Some("")` means it timed out or was submitted empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub difficulty: Difficulty,
    pub questions: Vec<Question>,
    #[serde(rename = "userAnswers", default)]
    pub user_answers: Vec<Option<String>>,
    #[serde(default)]
    pub counter: ScoreCounter,
}

impl ProgressSnapshot {
    pub fn new(difficulty: Difficulty, questions: Vec<Question>) -> Self {
        Self {
            difficulty,
            questions,
            user_answers: Vec::new(),
            counter: ScoreCounter::default(),
        }
    }

    /// Length of the leading run of attempted entries.
    pub fn answered_count(&self) -> usize {
        self.user_answers
            .iter()
            .take_while(|answer| answer.is_some())
            .count()
    }

    pub fn is_consistent(&self) -> bool {
        self.user_answers.len() <= self.questions.len()
    }

    pub fn is_complete(&self) -> bool {
        self.answered_count() == self.questions.len()
    }

    pub fn next_question(&self) -> Option<(usize, &Question)> {
        let index = self.answered_count();
        self.questions.get(index).map(|q| (index, q))
    }

    /// Drops anything after the first unattempted slot so answers stay in question order.
    pub fn trim_unattempted(&mut self) {
        let answered = self.answered_count();
        self.user_answers.truncate(answered);
    }

    pub fn push_answer(&mut self, answer: String) {
        self.trim_unattempted();
        self.user_answers.push(Some(answer));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(text: &str) -> Question {
        Question {
            text: text.to_string(),
            question_type: QuestionType::FillInTheBlank,
            choices: vec![],
            correct_answer: "x".to_string(),
            difficulty: Difficulty::Starter,
        }
    }

    #[test]
    fn test_difficulty_from_str() {
        assert_eq!("Starter".parse::<Difficulty>(), Ok(Difficulty::Starter));
        assert_eq!(" advanced ".parse::<Difficulty>(), Ok(Difficulty::Advanced));
        assert_eq!("1".parse::<Difficulty>(), Ok(Difficulty::Starter));
        assert_eq!("2".parse::<Difficulty>(), Ok(Difficulty::Advanced));
        assert!("expert".parse::<Difficulty>().is_err());
    }

    #[test]
    fn test_counter_ignores_invalid() {
        let mut counter = ScoreCounter::default();
        counter.record(&AnswerOutcome::Invalid {
            reason: "nope".to_string(),
        });
        assert_eq!(counter, ScoreCounter::default());

        counter.record(&AnswerOutcome::Correct);
        counter.record(&AnswerOutcome::Timeout);
        counter.record(&AnswerOutcome::Incorrect {
            correct_answer_shown: "x".to_string(),
        });
        assert_eq!(counter.correct, 1);
        assert_eq!(counter.wrong, 2);
        assert_eq!(counter.total(), 3);
    }

    #[test]
    fn test_snapshot_answered_count_stops_at_gap() {
        let mut snapshot =
            ProgressSnapshot::new(Difficulty::Starter, vec![question("a"), question("b"), question("c")]);
        snapshot.user_answers = vec![Some("x".to_string()), None, Some("y".to_string())];

        assert_eq!(snapshot.answered_count(), 1);
        assert_eq!(snapshot.next_question().map(|(i, _)| i), Some(1));

        snapshot.push_answer(String::new());
        assert_eq!(
            snapshot.user_answers,
            vec![Some("x".to_string()), Some(String::new())]
        );
    }

    #[test]
    fn test_empty_sentinel_counts_as_attempted() {
        let mut snapshot = ProgressSnapshot::new(Difficulty::Starter, vec![question("a")]);
        snapshot.push_answer(String::new());
        assert!(snapshot.is_complete());
        assert!(snapshot.next_question().is_none());
    }

    #[test]
    fn test_snapshot_json_shape() {
        let mut snapshot = ProgressSnapshot::new(Difficulty::Advanced, vec![question("a")]);
        snapshot.push_answer("x".to_string());
        snapshot.counter.correct = 1;

        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["difficulty"], "advanced");
        assert_eq!(value["userAnswers"][0], "x");
        assert_eq!(value["counter"]["correct"], 1);
        assert_eq!(value["questions"][0]["type"], "fill_in_the_blank");
        assert!(value["questions"][0].get("choices").is_none());
    }

    #[test]
    fn test_snapshot_accepts_null_answers() {
        let json = r#"{
            "difficulty": "starter",
            "questions": [],
            "userAnswers": [null],
            "counter": {"correct": 0, "wrong": 0}
        }"#;
        let snapshot: ProgressSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.user_answers, vec![None]);
        assert!(!snapshot.is_consistent());
    }
}
