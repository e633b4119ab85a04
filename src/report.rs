use crate::evaluator::evaluate;
use crate::models::{AnswerOutcome, Question};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Incorrect,
    Unanswered,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLine {
    pub number: usize,
    pub question: String,
    pub user_answer: String,
    pub correct_answer: String,
    pub verdict: Verdict,
}

/// End-of-run summary, rebuilt from the recorded answers rather than the
/// running counter so a resumed run reports the same numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub total: usize,
    pub correct: usize,
    /// Everything that is not correct, unanswered included.
    pub incorrect: usize,
    pub unanswered: usize,
    pub lines: Vec<ReportLine>,
}

impl Report {
    pub fn from_answers(questions: &[Question], answers: &[Option<String>]) -> Self {
        let lines: Vec<ReportLine> = questions
            .iter()
            .enumerate()
            .map(|(i, question)| {
                let answer = answers.get(i).cloned().flatten().unwrap_or_default();
                let verdict = if answer.is_empty() {
                    Verdict::Unanswered
                } else if evaluate(question, &answer) == AnswerOutcome::Correct {
                    Verdict::Correct
                } else {
                    Verdict::Incorrect
                };
                ReportLine {
                    number: i + 1,
                    question: question.text.clone(),
                    user_answer: answer,
                    correct_answer: question.correct_answer.clone(),
                    verdict,
                }
            })
            .collect();

        let total = lines.len();
        let correct = lines
            .iter()
            .filter(|l| l.verdict == Verdict::Correct)
            .count();
        let unanswered = lines
            .iter()
            .filter(|l| l.verdict == Verdict::Unanswered)
            .count();

        Self {
            total,
            correct,
            incorrect: total - correct,
            unanswered,
            lines,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Difficulty, QuestionType};

    fn questions() -> Vec<Question> {
        vec![
            Question {
                text: "2 + 2?".to_string(),
                question_type: QuestionType::MultipleChoice,
                choices: vec!["3", "4", "5", "6"].into_iter().map(String::from).collect(),
                correct_answer: "4".to_string(),
                difficulty: Difficulty::Starter,
            },
            Question {
                text: "Water is wet.".to_string(),
                question_type: QuestionType::TrueFalse,
                choices: vec![],
                correct_answer: "t".to_string(),
                difficulty: Difficulty::Starter,
            },
            Question {
                text: "Rust's mascot is ____.".to_string(),
                question_type: QuestionType::FillInTheBlank,
                choices: vec![],
                correct_answer: "Ferris".to_string(),
                difficulty: Difficulty::Starter,
            },
            Question {
                text: "Unreached".to_string(),
                question_type: QuestionType::FillInTheBlank,
                choices: vec![],
                correct_answer: "x".to_string(),
                difficulty: Difficulty::Starter,
            },
        ]
    }

    #[test]
    fn test_report_counts() {
        let answers = vec![
            Some("2".to_string()),
            Some("f".to_string()),
            Some(String::new()),
        ];
        let report = Report::from_answers(&questions(), &answers);

        assert_eq!(report.total, 4);
        assert_eq!(report.correct, 1);
        assert_eq!(report.incorrect, 3);
        assert_eq!(report.unanswered, 2);
        assert_eq!(report.lines[0].verdict, Verdict::Correct);
        assert_eq!(report.lines[1].verdict, Verdict::Incorrect);
        assert_eq!(report.lines[2].verdict, Verdict::Unanswered);
        assert_eq!(report.lines[3].verdict, Verdict::Unanswered);
        assert_eq!(report.lines[1].correct_answer, "t");
    }

    #[test]
    fn test_report_all_correct() {
        let answers = vec![
            Some("2".to_string()),
            Some("t".to_string()),
            Some("ferris".to_string()),
            Some("x".to_string()),
        ];
        let report = Report::from_answers(&questions(), &answers);
        assert_eq!(report.correct, 4);
        assert_eq!(report.incorrect, 0);
        assert_eq!(report.unanswered, 0);
    }
}
