//! Best-effort decoding of quiz lesson payloads.
//!
//! Parsing never fails. Question lists keep every entry that decodes and
//! leave validation to `QuizSession::load`; free text keeps only complete
//! questions and degrades to `Fallback` or `Empty`.

use std::collections::HashSet;

use serde::Deserialize;
use serde_json::Value;

use crate::model::{QuestionDraft, QuizContent};

/// Outcome of interpreting a quiz payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizPayload {
    /// Decoded questions, not yet validated.
    Structured(Vec<QuestionDraft>),
    /// Free text that is not a quiz yet; kept so the lesson can show it.
    Fallback(QuestionDraft),
    Empty,
}

impl QuizPayload {
    #[must_use]
    pub fn is_playable(&self) -> bool {
        matches!(self, Self::Structured(drafts) if !drafts.is_empty())
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        match self {
            Self::Structured(drafts) => drafts.len(),
            Self::Fallback(_) | Self::Empty => 0,
        }
    }

    /// Playable drafts, or `None` for fallback/empty payloads.
    #[must_use]
    pub fn into_drafts(self) -> Option<Vec<QuestionDraft>> {
        match self {
            Self::Structured(drafts) => Some(drafts),
            Self::Fallback(_) | Self::Empty => None,
        }
    }
}

#[must_use]
pub fn parse_quiz_content(content: &QuizContent) -> QuizPayload {
    match content {
        QuizContent::Raw(raw) => parse_quiz_text(raw),
        QuizContent::Structured(value) => parse_json_value(value).unwrap_or_else(|| {
            tracing::warn!("quiz payload is JSON but not a question list");
            QuizPayload::Empty
        }),
    }
}

#[must_use]
pub fn parse_quiz_text(raw: &str) -> QuizPayload {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return QuizPayload::Empty;
    }

    if trimmed.starts_with('[') || trimmed.starts_with('{') || trimmed.starts_with('"') {
        if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
            if let Some(payload) = parse_json_value(&value) {
                return payload;
            }
        }
    }

    let drafts = parse_lines(trimmed);
    if !drafts.is_empty() {
        return QuizPayload::Structured(drafts);
    }

    tracing::warn!(len = trimmed.len(), "quiz payload has no recognisable questions");
    QuizPayload::Fallback(QuestionDraft::new(trimmed, Vec::new()))
}

//
// ─── JSON ──────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AnswerKey {
    Index(usize),
    Text(String),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireOption {
    Text(String),
    Labeled {
        #[serde(alias = "label", alias = "value")]
        text: String,
        #[serde(default, alias = "isCorrect", alias = "is_correct")]
        correct: bool,
    },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireQuestion {
    #[serde(default, alias = "question_number", alias = "number")]
    question_number: Option<u32>,
    #[serde(alias = "question_text", alias = "question", alias = "text")]
    question_text: String,
    #[serde(default, alias = "choices")]
    options: Vec<WireOption>,
    #[serde(
        default,
        alias = "correct_option_index",
        alias = "correctAnswer",
        alias = "correct_answer",
        alias = "answer"
    )]
    correct_option_index: Option<AnswerKey>,
    #[serde(default)]
    marks: Option<u32>,
    #[serde(default)]
    explanation: Option<String>,
}

impl WireQuestion {
    fn into_draft(self) -> QuestionDraft {
        let mut flagged = None;
        let mut options = Vec::with_capacity(self.options.len());
        for (index, option) in self.options.into_iter().enumerate() {
            match option {
                WireOption::Text(text) => options.push(text),
                WireOption::Labeled { text, correct } => {
                    if correct && flagged.is_none() {
                        flagged = Some(index);
                    }
                    options.push(text);
                }
            }
        }

        let correct_option_index = match self.correct_option_index {
            Some(AnswerKey::Index(index)) => Some(index),
            Some(AnswerKey::Text(key)) => resolve_answer_key(&key, &options),
            None => None,
        }
        .or(flagged);

        QuestionDraft {
            question_number: self.question_number,
            question_text: self.question_text,
            options,
            correct_option_index,
            marks: self.marks,
            explanation: self.explanation,
        }
    }
}

/// `None` when the value is not shaped like a question list at all.
fn parse_json_value(value: &Value) -> Option<QuizPayload> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(map) => match map.get("questions") {
            Some(Value::Array(items)) => items,
            _ => return None,
        },
        Value::String(inner) => return Some(parse_quiz_text(inner)),
        _ => return None,
    };

    let mut drafts = Vec::with_capacity(items.len());
    for (position, item) in items.iter().enumerate() {
        match WireQuestion::deserialize(item) {
            Ok(wire) => drafts.push(wire.into_draft()),
            Err(err) => {
                tracing::warn!(position, error = %err, "skipping undecodable quiz question");
            }
        }
    }

    if drafts.is_empty() {
        tracing::warn!(items = items.len(), "quiz payload held no decodable questions");
        return Some(QuizPayload::Empty);
    }

    renumber_on_collision(&mut drafts);
    Some(QuizPayload::Structured(drafts))
}

/// Skipped entries can leave clashes between explicit and implicit numbers;
/// clashes fall back to list order.
fn renumber_on_collision(drafts: &mut [QuestionDraft]) {
    let mut seen = HashSet::new();
    let clash = drafts.iter().enumerate().any(|(position, draft)| {
        let number = draft
            .question_number
            .unwrap_or_else(|| u32::try_from(position + 1).unwrap_or(u32::MAX));
        !seen.insert(number)
    });
    if clash {
        for (position, draft) in drafts.iter_mut().enumerate() {
            draft.question_number = u32::try_from(position + 1).ok();
        }
    }
}

/// Resolve an answer given as option text, a letter (`B`) or a 1-based number (`2`).
fn resolve_answer_key(key: &str, options: &[String]) -> Option<usize> {
    let key = key.trim();
    if key.is_empty() {
        return None;
    }

    if let Some(index) = options
        .iter()
        .position(|option| option.trim().eq_ignore_ascii_case(key))
    {
        return Some(index);
    }

    let letters = key.trim_end_matches(['.', ')']);
    let mut chars = letters.chars();
    if let (Some(letter), None) = (chars.next(), chars.next()) {
        if letter.is_ascii_alphabetic() {
            return Some(usize::from(letter.to_ascii_lowercase() as u8 - b'a'));
        }
    }

    letters
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
}

//
// ─── PLAIN TEXT ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Default)]
struct PendingQuestion {
    number: Option<u32>,
    text: String,
    options: Vec<String>,
    marked: Option<usize>,
    answer: Option<String>,
    explanation: Option<String>,
}

impl PendingQuestion {
    fn finish(self) -> Option<QuestionDraft> {
        if self.text.trim().is_empty() || self.options.len() < 2 {
            return None;
        }
        let in_range = |index: &usize| *index < self.options.len();
        let correct = self
            .answer
            .as_deref()
            .and_then(|key| resolve_answer_key(key, &self.options))
            .filter(in_range)
            .or(self.marked.filter(in_range));

        Some(QuestionDraft {
            question_number: self.number,
            question_text: self.text,
            options: self.options,
            correct_option_index: correct,
            marks: None,
            explanation: self.explanation,
        })
    }
}

enum Line<'a> {
    Question { number: Option<u32>, text: &'a str },
    Option { text: &'a str, marked: bool },
    Answer(&'a str),
    Explanation(&'a str),
}

fn parse_lines(raw: &str) -> Vec<QuestionDraft> {
    let mut drafts = Vec::new();
    let mut pending: Option<PendingQuestion> = None;

    for line in raw.lines() {
        let Some(line) = classify(line.trim()) else {
            continue;
        };
        match line {
            Line::Question { number, text } => {
                if let Some(draft) = pending.take().and_then(PendingQuestion::finish) {
                    drafts.push(draft);
                }
                pending = Some(PendingQuestion {
                    number,
                    text: text.to_owned(),
                    ..PendingQuestion::default()
                });
            }
            Line::Option { text, marked } => {
                if let Some(question) = pending.as_mut() {
                    if marked && question.marked.is_none() {
                        question.marked = Some(question.options.len());
                    }
                    question.options.push(text.to_owned());
                }
            }
            Line::Answer(value) => {
                if let Some(question) = pending.as_mut() {
                    question.answer = Some(value.to_owned());
                }
            }
            Line::Explanation(value) => {
                if let Some(question) = pending.as_mut() {
                    question.explanation = Some(value.to_owned());
                }
            }
        }
    }

    if let Some(draft) = pending.and_then(PendingQuestion::finish) {
        drafts.push(draft);
    }

    renumber_on_collision(&mut drafts);
    drafts
}

fn classify(line: &str) -> Option<Line<'_>> {
    if line.is_empty() {
        return None;
    }
    if let Some(value) = strip_label(line, &["correct answer", "answer", "correct", "ans"]) {
        return Some(Line::Answer(value));
    }
    if let Some(value) = strip_label(line, &["explanation"]) {
        return Some(Line::Explanation(value));
    }
    if let Some((number, text)) = question_line(line) {
        return Some(Line::Question { number, text });
    }
    option_line(line).map(|(text, marked)| Line::Option { text, marked })
}

/// `label:` prefix, case-insensitive, with a non-empty value.
fn strip_label<'a>(line: &'a str, labels: &[&str]) -> Option<&'a str> {
    let (head, value) = line.split_once(':')?;
    let head = head.trim();
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    labels
        .iter()
        .any(|label| head.eq_ignore_ascii_case(label))
        .then_some(value)
}

/// `1. text`, `1) text`, `Q1: text`, `Q: text`, `Question 2: text`.
fn question_line(line: &str) -> Option<(Option<u32>, &str)> {
    let lower = line.to_ascii_lowercase();
    let rest_start = if lower.starts_with("question") {
        "question".len()
    } else if lower.starts_with('q') {
        1
    } else {
        0
    };

    let rest = &line[rest_start..];
    let digits_len = rest.trim_start().chars().take_while(char::is_ascii_digit).count();
    let after_ws = rest.trim_start();
    let number = after_ws[..digits_len].parse::<u32>().ok();
    let tail = &after_ws[digits_len..];

    if rest_start == 0 && number.is_none() {
        return None;
    }

    let mut tail_chars = tail.chars();
    let separator = tail_chars.next()?;
    let allowed = match (rest_start, number) {
        (0, _) => matches!(separator, '.' | ')'),
        // A bare `Q)` or `Q.` is the 17th option label.
        (1, None) => separator == ':',
        _ => matches!(separator, ':' | '.' | ')'),
    };
    if !allowed {
        return None;
    }

    let text = tail_chars.as_str().trim();
    if text.is_empty() {
        return None;
    }
    // "1.5 is ..." is prose, not a numbered question.
    if rest_start == 0 && !tail_chars.as_str().starts_with(char::is_whitespace) {
        return None;
    }
    Some((number, text))
}

/// `A) x`, `a. x`, `(b) x`, `- x`, `* x`; a trailing `*` or `(correct)` marks the answer.
fn option_line(line: &str) -> Option<(&str, bool)> {
    let body = if let Some(rest) = line.strip_prefix(['-', '*', '•']) {
        rest
    } else {
        let inner = line.strip_prefix('(').unwrap_or(line);
        let mut chars = inner.chars();
        let letter = chars.next()?;
        let separator = chars.next()?;
        if !letter.is_ascii_alphabetic() || !matches!(separator, ')' | '.') {
            return None;
        }
        let rest = chars.as_str();
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        rest
    };

    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    let lower = body.to_ascii_lowercase();
    if lower.ends_with("(correct)") {
        let text = body[..body.len() - "(correct)".len()].trim_end();
        return (!text.is_empty()).then_some((text, true));
    }
    if let Some(text) = body.strip_suffix('*') {
        let text = text.trim_end();
        return (!text.is_empty()).then_some((text, true));
    }
    Some((body, false))
}
