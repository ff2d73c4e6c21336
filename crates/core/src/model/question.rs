use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Raised when a quiz definition cannot be played.
///
/// The UI maps every variant to the same "content not available" state; the
/// detail is for logs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InvalidQuizError {
    #[error("quiz has no questions")]
    Empty,

    #[error("question at position {position} has number 0")]
    InvalidNumber { position: usize },

    #[error("question number {number} appears more than once")]
    DuplicateNumber { number: u32 },

    #[error("question {number} has empty text")]
    EmptyText { number: u32 },

    #[error("question {number} has {count} option(s), at least 2 are required")]
    TooFewOptions { number: u32, count: usize },

    #[error("question {number} has an empty option at index {index}")]
    EmptyOption { number: u32, index: usize },

    #[error("question {number} marks option {index} correct but has only {options} options")]
    CorrectIndexOutOfRange {
        number: u32,
        index: usize,
        options: usize,
    },

    #[error("question {number} carries zero marks")]
    ZeroMarks { number: u32 },
}

//
// ─── DRAFT ─────────────────────────────────────────────────────────────────────
//

/// Unvalidated question as it arrives from a content source or the parser.
///
/// Serializes in the backend's camelCase shape and also reads snake_case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDraft {
    /// 1-based number; `None` falls back to the draft's position in the list.
    #[serde(default, alias = "question_number")]
    pub question_number: Option<u32>,
    #[serde(alias = "question_text")]
    pub question_text: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default, alias = "correct_option_index")]
    pub correct_option_index: Option<usize>,
    /// `None` means the default weight of 1.
    #[serde(default)]
    pub marks: Option<u32>,
    #[serde(default)]
    pub explanation: Option<String>,
}

impl QuestionDraft {
    pub fn new(question_text: impl Into<String>, options: Vec<String>) -> Self {
        Self {
            question_text: question_text.into(),
            options,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_number(mut self, number: u32) -> Self {
        self.question_number = Some(number);
        self
    }

    #[must_use]
    pub fn with_correct(mut self, index: usize) -> Self {
        self.correct_option_index = Some(index);
        self
    }

    #[must_use]
    pub fn with_marks(mut self, marks: u32) -> Self {
        self.marks = Some(marks);
        self
    }

    #[must_use]
    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(explanation.into());
        self
    }

    /// Validate this draft. `position` is the 0-based slot in the source list.
    ///
    /// # Errors
    ///
    /// Returns `InvalidQuizError` describing the first problem found.
    pub fn validate(self, position: usize) -> Result<QuizQuestion, InvalidQuizError> {
        let number = match self.question_number {
            Some(0) => return Err(InvalidQuizError::InvalidNumber { position }),
            Some(n) => n,
            None => u32::try_from(position + 1)
                .map_err(|_| InvalidQuizError::InvalidNumber { position })?,
        };

        let question_text = self.question_text.trim().to_owned();
        if question_text.is_empty() {
            return Err(InvalidQuizError::EmptyText { number });
        }

        if self.options.len() < 2 {
            return Err(InvalidQuizError::TooFewOptions {
                number,
                count: self.options.len(),
            });
        }

        let mut options = Vec::with_capacity(self.options.len());
        for (index, option) in self.options.into_iter().enumerate() {
            let option = option.trim().to_owned();
            if option.is_empty() {
                return Err(InvalidQuizError::EmptyOption { number, index });
            }
            options.push(option);
        }

        if let Some(index) = self.correct_option_index.filter(|i| *i >= options.len()) {
            return Err(InvalidQuizError::CorrectIndexOutOfRange {
                number,
                index,
                options: options.len(),
            });
        }

        let marks = self.marks.unwrap_or(1);
        if marks == 0 {
            return Err(InvalidQuizError::ZeroMarks { number });
        }

        let explanation = self
            .explanation
            .map(|text| text.trim().to_owned())
            .filter(|text| !text.is_empty());

        Ok(QuizQuestion {
            number,
            text: question_text,
            options,
            correct_option_index: self.correct_option_index,
            marks,
            explanation,
        })
    }
}

//
// ─── VALIDATED QUESTION ────────────────────────────────────────────────────────
//

/// A playable multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizQuestion {
    number: u32,
    text: String,
    options: Vec<String>,
    correct_option_index: Option<usize>,
    marks: u32,
    explanation: Option<String>,
}

impl QuizQuestion {
    #[must_use]
    pub fn number(&self) -> u32 {
        self.number
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    #[must_use]
    pub fn correct_option_index(&self) -> Option<usize> {
        self.correct_option_index
    }

    #[must_use]
    pub fn marks(&self) -> u32 {
        self.marks
    }

    #[must_use]
    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    /// Questions without an answer key are shown but never score.
    #[must_use]
    pub fn is_graded(&self) -> bool {
        self.correct_option_index.is_some()
    }

    #[must_use]
    pub fn is_correct_option(&self, option_index: usize) -> bool {
        self.correct_option_index == Some(option_index)
    }
}

/// Validate a list of drafts into questions ordered by question number.
///
/// # Errors
///
/// Returns `InvalidQuizError::Empty` for an empty list, and the first
/// per-question error otherwise.
pub fn validate_questions(drafts: Vec<QuestionDraft>) -> Result<Vec<QuizQuestion>, InvalidQuizError> {
    if drafts.is_empty() {
        return Err(InvalidQuizError::Empty);
    }

    let mut questions = drafts
        .into_iter()
        .enumerate()
        .map(|(position, draft)| draft.validate(position))
        .collect::<Result<Vec<_>, _>>()?;

    questions.sort_by_key(QuizQuestion::number);
    if let Some(pair) = questions.windows(2).find(|w| w[0].number == w[1].number) {
        return Err(InvalidQuizError::DuplicateNumber {
            number: pair[0].number,
        });
    }

    Ok(questions)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("Option {i}")).collect()
    }

    #[test]
    fn draft_reads_camel_and_snake_case() {
        let camel: QuestionDraft = serde_json::from_value(serde_json::json!({
            "questionNumber": 2,
            "questionText": "Pick",
            "options": ["a", "b"],
            "correctOptionIndex": 1
        }))
        .unwrap();
        let snake: QuestionDraft = serde_json::from_value(serde_json::json!({
            "question_number": 2,
            "question_text": "Pick",
            "options": ["a", "b"],
            "correct_option_index": 1
        }))
        .unwrap();
        assert_eq!(camel, snake);
        assert_eq!(camel.correct_option_index, Some(1));
        assert_eq!(camel.marks, None);

        let written = serde_json::to_value(&camel).unwrap();
        assert_eq!(written["questionText"], "Pick");
        assert_eq!(written["correctOptionIndex"], 1);
    }

    #[test]
    fn draft_defaults_number_and_marks() {
        let q = QuestionDraft::new("What is 2 + 2?", options(4))
            .with_correct(1)
            .validate(2)
            .unwrap();
        assert_eq!(q.number(), 3);
        assert_eq!(q.marks(), 1);
        assert!(q.is_correct_option(1));
        assert!(q.is_graded());
    }

    #[test]
    fn draft_rejects_single_option() {
        let err = QuestionDraft::new("Pick", options(1)).validate(0).unwrap_err();
        assert_eq!(err, InvalidQuizError::TooFewOptions { number: 1, count: 1 });
    }

    #[test]
    fn draft_rejects_out_of_range_answer_key() {
        let err = QuestionDraft::new("Pick", options(2))
            .with_correct(2)
            .validate(0)
            .unwrap_err();
        assert!(matches!(err, InvalidQuizError::CorrectIndexOutOfRange { index: 2, .. }));
    }

    #[test]
    fn draft_rejects_blank_text_and_zero_marks() {
        let err = QuestionDraft::new("   ", options(2)).validate(0).unwrap_err();
        assert_eq!(err, InvalidQuizError::EmptyText { number: 1 });

        let err = QuestionDraft::new("Pick", options(2))
            .with_marks(0)
            .validate(0)
            .unwrap_err();
        assert_eq!(err, InvalidQuizError::ZeroMarks { number: 1 });
    }

    #[test]
    fn blank_explanation_is_dropped() {
        let q = QuestionDraft::new("Pick", options(2))
            .with_explanation("  ")
            .validate(0)
            .unwrap();
        assert_eq!(q.explanation(), None);
    }

    #[test]
    fn validate_questions_sorts_by_number() {
        let drafts = vec![
            QuestionDraft::new("second", options(2)).with_number(2),
            QuestionDraft::new("first", options(2)).with_number(1),
        ];
        let questions = validate_questions(drafts).unwrap();
        assert_eq!(questions[0].text(), "first");
        assert_eq!(questions[1].text(), "second");
    }

    #[test]
    fn validate_questions_rejects_duplicates() {
        let drafts = vec![
            QuestionDraft::new("a", options(2)).with_number(1),
            QuestionDraft::new("b", options(2)),
        ];
        let err = validate_questions(drafts).unwrap_err();
        assert_eq!(err, InvalidQuizError::DuplicateNumber { number: 1 });
    }
}
