use course_core::model::QuizAttempt;
use services::{AttemptId, AttemptListItem};

use crate::vm::time_fmt::{format_datetime, format_duration};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttemptCardVm {
    pub id: AttemptId,
    pub completed_at_str: String,
    pub score_label: String,
    pub detail: String,
}

#[must_use]
pub fn map_attempt_cards(items: &[AttemptListItem]) -> Vec<AttemptCardVm> {
    items.iter().map(map_attempt_card).collect()
}

#[must_use]
pub fn map_attempt_card(item: &AttemptListItem) -> AttemptCardVm {
    AttemptCardVm {
        id: item.id,
        completed_at_str: format_datetime(item.completed_at),
        score_label: format!("{}%", item.score_percent),
        detail: format!(
            "{} of {} correct, {} answered",
            item.correct, item.total, item.answered
        ),
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttemptDetailVm {
    pub lesson_id: u64,
    pub started_at_str: String,
    pub completed_at_str: String,
    pub duration_str: String,
    pub answered: u32,
    pub total: u32,
    pub correct: u32,
    pub unanswered: u32,
    pub score_percent: u8,
    pub marks_str: String,
}

#[must_use]
pub fn map_attempt_detail(attempt: &QuizAttempt) -> AttemptDetailVm {
    let result = attempt.result();
    AttemptDetailVm {
        lesson_id: attempt.lesson_id().value(),
        started_at_str: format_datetime(attempt.started_at()),
        completed_at_str: format_datetime(attempt.completed_at()),
        duration_str: format_duration(attempt.started_at(), attempt.completed_at()),
        answered: result.answered_count(),
        total: result.total_count(),
        correct: result.correct_count(),
        unanswered: result.unanswered_count(),
        score_percent: result.score_percent(),
        marks_str: format!("{} / {}", result.marks_awarded(), result.marks_total()),
    }
}
