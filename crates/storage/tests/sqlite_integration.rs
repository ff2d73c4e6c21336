use chrono::Duration;
use course_core::model::{LessonId, QuestionDraft, QuizAttempt, QuizSession};
use course_core::time::fixed_now;
use storage::repository::{QuizAttemptRepository, Storage, StorageError};
use storage::sqlite::SqliteRepository;

fn attempt(lesson: u64, offset_minutes: i64, answers: &[(usize, usize)]) -> QuizAttempt {
    let start = fixed_now() + Duration::minutes(offset_minutes);
    let options = || vec!["a".to_string(), "b".to_string(), "c".to_string()];
    let drafts = vec![
        QuestionDraft::new("One", options()).with_correct(0),
        QuestionDraft::new("Two", options()).with_correct(1).with_marks(2),
        QuestionDraft::new("Three", options()),
    ];
    let mut session = QuizSession::load(drafts, start).unwrap();
    for &(question, option) in answers {
        session.select_answer(question, option).unwrap();
    }
    session.submit(start + Duration::minutes(2));
    session.attempt(LessonId::new(lesson)).unwrap()
}

#[tokio::test]
async fn sqlite_round_trips_attempts() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_attempts?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let original = attempt(7, 0, &[(0, 0), (1, 1), (2, 2)]);
    let id = repo.append_attempt(&original).await.unwrap();

    let fetched = repo.get_attempt(id).await.unwrap();
    assert_eq!(fetched, original);
    assert_eq!(fetched.result().correct_count(), 2);
    assert_eq!(fetched.result().marks_awarded(), 3);
    assert_eq!(fetched.result().score_percent(), 67);

    assert!(matches!(
        repo.get_attempt(id + 100).await,
        Err(StorageError::NotFound)
    ));
}

#[tokio::test]
async fn sqlite_lists_newest_first_per_lesson() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_attempt_list?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");
    // Running migrations twice is a no-op.
    repo.migrate().await.expect("migrate again");

    let first = repo.append_attempt(&attempt(1, 0, &[])).await.unwrap();
    let second = repo.append_attempt(&attempt(1, 30, &[(0, 0)])).await.unwrap();
    repo.append_attempt(&attempt(2, 60, &[(0, 1)])).await.unwrap();

    let rows = repo.list_attempts(LessonId::new(1), 10).await.unwrap();
    let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
    assert_eq!(ids, vec![second, first]);
    assert_eq!(rows[1].attempt.result().answered_count(), 0);

    let limited = repo.list_attempts(LessonId::new(1), 1).await.unwrap();
    assert_eq!(limited.len(), 1);
}

#[tokio::test]
async fn storage_sqlite_constructor_migrates() {
    let storage = Storage::sqlite("sqlite:file:memdb_storage_ctor?mode=memory&cache=shared")
        .await
        .expect("storage");
    let id = storage
        .attempts
        .append_attempt(&attempt(3, 0, &[(0, 0)]))
        .await
        .unwrap();
    assert_eq!(
        storage.attempts.get_attempt(id).await.unwrap().lesson_id(),
        LessonId::new(3)
    );
}
