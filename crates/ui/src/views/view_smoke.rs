use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use course_core::model::{LessonId, QuestionDraft, QuizAttempt, QuizSession};
use course_core::time::fixed_now;
use services::{InMemoryCourseSource, course_from_json};
use storage::repository::{AttemptId, AttemptRow, QuizAttemptRepository, Storage, StorageError};

use super::test_harness::{ViewKind, setup_view_harness, setup_view_harness_with};
use crate::vm::QuizIntent;

fn sample_attempt(lesson_id: u64) -> QuizAttempt {
    let now = fixed_now();
    let drafts = vec![
        QuestionDraft::new("a", vec!["x".into(), "y".into()]).with_correct(0),
        QuestionDraft::new("b", vec!["x".into(), "y".into()]).with_correct(1),
    ];
    let mut session = QuizSession::load(drafts, now).expect("load quiz");
    session.select_answer(0, 0).expect("select");
    session.submit(now + Duration::seconds(42));
    session.attempt(LessonId::new(lesson_id)).expect("attempt")
}

struct FailingAttempts;

#[async_trait]
impl QuizAttemptRepository for FailingAttempts {
    async fn append_attempt(&self, _attempt: &QuizAttempt) -> Result<AttemptId, StorageError> {
        Err(StorageError::Connection("offline".into()))
    }

    async fn get_attempt(&self, _id: AttemptId) -> Result<QuizAttempt, StorageError> {
        Err(StorageError::Connection("offline".into()))
    }

    async fn list_attempts(
        &self,
        _lesson_id: LessonId,
        _limit: u32,
    ) -> Result<Vec<AttemptRow>, StorageError> {
        Err(StorageError::Connection("offline".into()))
    }
}

#[tokio::test(flavor = "current_thread")]
async fn home_view_renders_course_outline() {
    let mut harness = setup_view_harness(ViewKind::Home);
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Rust Foundations"), "{html}");
    assert!(html.contains("6 lessons, 3 quizzes"), "{html}");
    assert!(html.contains("Getting started"), "{html}");
    assert!(html.contains("Ownership"), "{html}");
}

#[tokio::test(flavor = "current_thread")]
async fn home_view_reports_missing_course() {
    let mut harness = setup_view_harness_with(
        ViewKind::Home,
        Storage::in_memory(),
        Arc::new(InMemoryCourseSource::default()),
    );
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("This page could not be found."), "{html}");
}

#[tokio::test(flavor = "current_thread")]
async fn text_lesson_renders_markdown_and_navigation() {
    let mut harness = setup_view_harness(ViewKind::Lesson(101));
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("<code>let mut</code>"), "{html}");
    assert!(html.contains("Rust Foundations / Getting started"), "{html}");
    assert!(html.contains("Previous"), "{html}");
    assert!(html.contains("Next"), "{html}");
}

#[tokio::test(flavor = "current_thread")]
async fn unknown_lesson_is_not_found() {
    let mut harness = setup_view_harness(ViewKind::Lesson(999));
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("This page could not be found."), "{html}");
    assert!(!html.contains("Retry"), "{html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_lesson_plays_through_to_a_stored_result() {
    let mut harness = setup_view_harness(ViewKind::Lesson(102));
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Question 1 of 2"), "{html}");
    assert!(html.contains("0 of 2 answered"), "{html}");

    harness.dispatch_quiz(QuizIntent::Select(1)).await;
    let html = harness.render();
    assert!(html.contains("Correct!"), "{html}");
    assert!(html.contains("1 of 2 answered"), "{html}");

    harness.dispatch_quiz(QuizIntent::Next).await;
    assert!(harness.render().contains("Question 2 of 2"));

    harness.dispatch_quiz(QuizIntent::Submit).await;
    let html = harness.render();
    assert!(html.contains("Quiz complete"), "{html}");
    assert!(html.contains("Score: 50%"), "{html}");
    assert!(!html.contains("has not been saved"), "{html}");

    let rows = harness
        .storage
        .attempts
        .list_attempts(LessonId::new(102), 10)
        .await
        .expect("list attempts");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].attempt.result().score_percent(), 50);
}

#[tokio::test(flavor = "current_thread")]
async fn answered_question_stays_locked() {
    let mut harness = setup_view_harness(ViewKind::Lesson(102));
    harness.settle().await;

    harness.dispatch_quiz(QuizIntent::Select(0)).await;
    harness.dispatch_quiz(QuizIntent::Select(1)).await;

    let html = harness.render();
    assert!(html.contains("Not quite."), "{html}");
    assert!(!html.contains("Something went wrong"), "{html}");
    let vm = harness.quiz_vm().expect("quiz loaded");
    assert_eq!(vm.run().session().answered_count(), 1);
}

#[tokio::test(flavor = "current_thread")]
async fn retake_starts_a_fresh_run() {
    let mut harness = setup_view_harness(ViewKind::Lesson(201));
    harness.settle().await;

    harness.dispatch_quiz(QuizIntent::Submit).await;
    assert!(harness.render().contains("Score: 0%"));

    harness.dispatch_quiz(QuizIntent::Retake).await;
    let html = harness.render();
    assert!(html.contains("Question 1 of 2"), "{html}");
    assert!(!html.contains("Quiz complete"), "{html}");
}

#[tokio::test(flavor = "current_thread")]
async fn prose_quiz_payload_is_coming_soon() {
    let mut harness = setup_view_harness(ViewKind::Lesson(202));
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("This quiz will be available soon."), "{html}");
    assert!(html.contains("after the lifetimes module"), "{html}");
}

#[tokio::test(flavor = "current_thread")]
async fn malformed_quiz_shows_content_not_available() {
    let course = course_from_json(serde_json::json!({
        "id": 1,
        "title": "Broken Course",
        "modules": [{
            "id": 1,
            "title": "Only module",
            "lessons": [{
                "id": 300,
                "title": "Broken quiz",
                "type": "QUIZ",
                "content": [
                    {"questionText": "Fine", "options": ["a", "b"], "correctOptionIndex": 0},
                    {"questionText": "Bad key", "options": ["a", "b"], "correctOptionIndex": 7}
                ]
            }]
        }]
    }))
    .expect("decode course");
    let mut harness = setup_view_harness_with(
        ViewKind::Lesson(300),
        Storage::in_memory(),
        Arc::new(InMemoryCourseSource::new([course])),
    );
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("This quiz content is not available."), "{html}");
    assert!(!html.contains("Question 1 of"), "{html}");
    assert!(!html.contains("available soon"), "{html}");
    assert!(!html.contains("Retry"), "{html}");
}

#[tokio::test(flavor = "current_thread")]
async fn unsaved_result_offers_retry() {
    let mut harness = setup_view_harness_with(
        ViewKind::Lesson(102),
        Storage {
            attempts: Arc::new(FailingAttempts),
        },
        Arc::new(InMemoryCourseSource::demo()),
    );
    harness.settle().await;

    harness.dispatch_quiz(QuizIntent::Select(1)).await;
    harness.dispatch_quiz(QuizIntent::Submit).await;

    let html = harness.render();
    assert!(html.contains("Something went wrong"), "{html}");
    assert!(html.contains("Retry"), "{html}");
    assert!(html.contains("This result has not been saved yet."), "{html}");
}

#[tokio::test(flavor = "current_thread")]
async fn history_view_lists_attempts_with_best_score() {
    let mut harness = setup_view_harness(ViewKind::History(102));
    harness
        .storage
        .attempts
        .append_attempt(&sample_attempt(102))
        .await
        .expect("append attempt");
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Quiz History"), "{html}");
    assert!(html.contains("Best score: 50%"), "{html}");
    assert!(html.contains("1 of 2 correct, 1 answered"), "{html}");
    assert!(html.contains("Check your understanding"), "{html}");
}

#[tokio::test(flavor = "current_thread")]
async fn history_view_empty_state() {
    let mut harness = setup_view_harness(ViewKind::History(201));
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("No attempts yet."), "{html}");
}

#[tokio::test(flavor = "current_thread")]
async fn history_view_storage_failure_is_retryable() {
    let mut harness = setup_view_harness_with(
        ViewKind::History(102),
        Storage {
            attempts: Arc::new(FailingAttempts),
        },
        Arc::new(InMemoryCourseSource::demo()),
    );
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Something went wrong"), "{html}");
    assert!(html.contains("Retry"), "{html}");
}

#[tokio::test(flavor = "current_thread")]
async fn attempt_view_renders_details() {
    let mut harness = setup_view_harness(ViewKind::Attempt(1));
    harness
        .storage
        .attempts
        .append_attempt(&sample_attempt(102))
        .await
        .expect("append attempt");
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Attempt Summary"), "{html}");
    assert!(html.contains("0:42"), "{html}");
    assert!(html.contains("50%"), "{html}");
    assert!(html.contains("Back to history"), "{html}");
}

#[tokio::test(flavor = "current_thread")]
async fn missing_attempt_is_not_found() {
    let mut harness = setup_view_harness(ViewKind::Attempt(7));
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("This page could not be found."), "{html}");
}
