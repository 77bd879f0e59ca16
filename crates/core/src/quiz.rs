//! Trivia quiz: question validation, fallback set, and scoring.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Questions shown per quiz round.
pub const QUIZ_LENGTH: usize = 5;

/// Shown as the selected answer for unanswered questions.
pub const NO_ANSWER: &str = "No answer";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuestionRecord {
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
}

impl QuestionRecord {
    /// A question needs text, at least two unique options, and an answer
    /// that is one of them.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.question.trim().is_empty() {
            return Err(CoreError::Validation("Question text must not be empty".into()));
        }
        if self.options.len() < 2 {
            return Err(CoreError::Validation(format!(
                "Question '{}' needs at least two options",
                self.question
            )));
        }
        let mut seen = HashSet::with_capacity(self.options.len());
        for option in &self.options {
            if !seen.insert(option.as_str()) {
                return Err(CoreError::Validation(format!(
                    "Duplicate option '{option}' in question '{}'",
                    self.question
                )));
            }
        }
        if !seen.contains(self.answer.as_str()) {
            return Err(CoreError::Validation(format!(
                "Answer '{}' is not among the options of '{}'",
                self.answer, self.question
            )));
        }
        Ok(())
    }
}

fn question(text: &str, options: &[&str], answer: &str) -> QuestionRecord {
    QuestionRecord {
        question: text.to_string(),
        options: options.iter().map(|o| o.to_string()).collect(),
        answer: answer.to_string(),
    }
}

/// Built-in questions used when the remote endpoint is down or empty.
pub fn fallback_questions() -> Vec<QuestionRecord> {
    vec![
        question(
            "Who is the headmaster of Hogwarts at the start of the series?",
            &[
                "Albus Dumbledore",
                "Minerva McGonagall",
                "Severus Snape",
                "Dolores Umbridge",
            ],
            "Albus Dumbledore",
        ),
        question(
            "What animal is Harry's Patronus?",
            &["Lion", "Stag", "Phoenix", "Wolf"],
            "Stag",
        ),
        question(
            "Which subject did Severus Snape teach?",
            &[
                "Defence Against the Dark Arts",
                "Potions",
                "Charms",
                "Care of Magical Creatures",
            ],
            "Potions",
        ),
    ]
}

/// Pick the round's questions from a fetched set.
///
/// Invalid questions are dropped, the first [`QUIZ_LENGTH`] valid ones are
/// kept, and the fallback set is used when nothing valid remains.
pub fn select_questions(fetched: Vec<QuestionRecord>) -> Vec<QuestionRecord> {
    let valid: Vec<QuestionRecord> = fetched
        .into_iter()
        .filter(|q| q.validate().is_ok())
        .take(QUIZ_LENGTH)
        .collect();

    if valid.is_empty() {
        fallback_questions()
    } else {
        valid
    }
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResult {
    pub question: String,
    pub selected: String,
    pub correct_answer: String,
    pub is_correct: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct QuizResult {
    pub score: usize,
    pub total: usize,
    pub details: Vec<QuestionResult>,
}

/// Score a submitted quiz. `answers[i]` is the option picked for
/// `questions[i]`; missing trailing answers count as unanswered.
pub fn score_quiz(questions: &[QuestionRecord], answers: &[Option<String>]) -> QuizResult {
    let details: Vec<QuestionResult> = questions
        .iter()
        .enumerate()
        .map(|(i, q)| {
            let selected = answers.get(i).cloned().flatten();
            let is_correct = selected.as_deref() == Some(q.answer.as_str());
            QuestionResult {
                question: q.question.clone(),
                selected: selected.unwrap_or_else(|| NO_ANSWER.to_string()),
                correct_answer: q.answer.clone(),
                is_correct,
            }
        })
        .collect();

    QuizResult {
        score: details.iter().filter(|d| d.is_correct).count(),
        total: questions.len(),
        details,
    }
}
