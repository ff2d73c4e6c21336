use std::sync::Arc;

use course_core::model::{CourseId, LessonId, QuizContent, QuizSession};
use course_core::{QuizPayload, parse_quiz_content};
use storage::repository::{AttemptId, QuizAttemptRepository};

use super::run::{QuizRun, QuizStart, QuizSubmission, QuizUnavailable};
use crate::Clock;
use crate::course_service::CourseService;
use crate::error::QuizError;

/// Orchestrates quiz start, submission with attempt persistence, and retakes.
#[derive(Clone)]
pub struct QuizLoopService {
    clock: Clock,
    courses: CourseService,
    attempts: Arc<dyn QuizAttemptRepository>,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(
        clock: Clock,
        courses: CourseService,
        attempts: Arc<dyn QuizAttemptRepository>,
    ) -> Self {
        Self {
            clock,
            courses,
            attempts,
        }
    }

    /// Load a quiz lesson and start a fresh run.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NotAQuiz` for non-quiz lessons and `QuizError::Course`
    /// when the lesson cannot be loaded.
    pub async fn start_quiz(
        &self,
        course_id: CourseId,
        lesson_id: LessonId,
    ) -> Result<QuizStart, QuizError> {
        let ctx = self.courses.get_lesson(course_id, lesson_id).await?;
        if !ctx.lesson.is_quiz() {
            return Err(QuizError::NotAQuiz(lesson_id));
        }

        let Some(content) = ctx.lesson.quiz.as_ref() else {
            tracing::debug!(lesson = %lesson_id, "quiz lesson has no payload");
            return Ok(QuizStart::Unavailable(QuizUnavailable::ComingSoon {
                note: ctx.lesson.body.clone(),
            }));
        };

        Ok(self.start_from_content(lesson_id, content))
    }

    /// Start a run from an already loaded payload.
    #[must_use]
    pub fn start_from_content(&self, lesson_id: LessonId, content: &QuizContent) -> QuizStart {
        let drafts = match parse_quiz_content(content) {
            QuizPayload::Structured(drafts) => drafts,
            QuizPayload::Fallback(draft) => {
                let note = Some(draft.question_text).filter(|text| !text.trim().is_empty());
                return QuizStart::Unavailable(QuizUnavailable::ComingSoon { note });
            }
            QuizPayload::Empty => {
                return QuizStart::Unavailable(QuizUnavailable::ComingSoon { note: None });
            }
        };

        match QuizSession::load(drafts, self.clock.now()) {
            Ok(session) => {
                tracing::debug!(lesson = %lesson_id, questions = session.len(), "quiz started");
                QuizStart::Ready(QuizRun::new(lesson_id, session))
            }
            Err(err) => {
                tracing::warn!(lesson = %lesson_id, error = %err, "quiz payload failed validation");
                QuizStart::Unavailable(QuizUnavailable::Invalid(err))
            }
        }
    }

    /// Complete the run and persist its attempt once.
    ///
    /// Submitting an already submitted run returns the same result without
    /// writing a second attempt.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Storage` if the attempt cannot be stored. The run
    /// stays submitted; call `finalize_attempt` to retry persistence.
    pub async fn submit(&self, run: &mut QuizRun) -> Result<QuizSubmission, QuizError> {
        let result = run.session_mut().submit(self.clock.now());
        let attempt_id = self.finalize_attempt(run).await?;
        tracing::debug!(
            lesson = %run.lesson_id(),
            attempt = attempt_id,
            score = result.score_percent(),
            "quiz submitted"
        );
        Ok(QuizSubmission {
            result,
            attempt_id: Some(attempt_id),
        })
    }

    /// Persist the attempt for a submitted run if not done yet.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NotSubmitted` before submission and
    /// `QuizError::Storage` if persistence fails.
    pub async fn finalize_attempt(&self, run: &mut QuizRun) -> Result<AttemptId, QuizError> {
        if let Some(id) = run.attempt_id() {
            return Ok(id);
        }
        if !run.is_completed() {
            return Err(QuizError::NotSubmitted);
        }

        let attempt = run.session().attempt(run.lesson_id())?;
        let id = self.attempts.append_attempt(&attempt).await.map_err(|err| {
            tracing::warn!(lesson = %run.lesson_id(), error = %err, "failed to store quiz attempt");
            err
        })?;
        run.set_attempt_id(Some(id));
        Ok(id)
    }

    /// Start over on the same questions.
    pub fn retake(&self, run: &mut QuizRun) {
        run.session_mut().reset(self.clock.now());
        run.set_attempt_id(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use course_core::model::{InvalidQuizError, QuizAttempt};
    use course_core::time::fixed_now;
    use storage::repository::{AttemptRow, InMemoryRepository, StorageError};

    fn service_with(repo: Arc<dyn QuizAttemptRepository>) -> QuizLoopService {
        QuizLoopService::new(Clock::Fixed(fixed_now()), CourseService::demo(), repo)
    }

    fn service() -> (QuizLoopService, InMemoryRepository) {
        let repo = InMemoryRepository::new();
        (service_with(Arc::new(repo.clone())), repo)
    }

    async fn ready(svc: &QuizLoopService, lesson: u64) -> QuizRun {
        svc.start_quiz(CourseId::new(1), LessonId::new(lesson))
            .await
            .unwrap()
            .into_run()
            .expect("quiz should be playable")
    }

    #[tokio::test]
    async fn structured_and_text_quizzes_start() {
        let (svc, _) = service();
        assert_eq!(ready(&svc, 102).await.session().len(), 2);
        assert_eq!(ready(&svc, 201).await.session().len(), 2);
    }

    #[tokio::test]
    async fn prose_payload_is_coming_soon_with_note() {
        let (svc, _) = service();
        let start = svc
            .start_quiz(CourseId::new(1), LessonId::new(202))
            .await
            .unwrap();
        match start {
            QuizStart::Unavailable(QuizUnavailable::ComingSoon { note }) => {
                assert!(note.unwrap().contains("lifetimes"));
            }
            other => panic!("unexpected start: {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_quiz_lesson_is_rejected() {
        let (svc, _) = service();
        let err = svc
            .start_quiz(CourseId::new(1), LessonId::new(101))
            .await
            .unwrap_err();
        assert!(matches!(err, QuizError::NotAQuiz(_)));
    }

    #[test]
    fn malformed_structured_question_rejects_the_quiz() {
        let (svc, _) = service();
        let content = QuizContent::Structured(serde_json::json!([
            {"questionNumber": 1, "questionText": "Fine", "options": ["a", "b"], "correctOptionIndex": 0},
            {"questionNumber": 2, "questionText": "Bad key", "options": ["a", "b"], "correctOptionIndex": 7},
            {"questionNumber": 3, "questionText": "One option", "options": ["a"]}
        ]));
        let start = svc.start_from_content(LessonId::new(9), &content);
        assert!(
            matches!(
                start,
                QuizStart::Unavailable(QuizUnavailable::Invalid(
                    InvalidQuizError::CorrectIndexOutOfRange { number: 2, .. }
                ))
            ),
            "{start:?}"
        );
    }

    #[test]
    fn single_question_with_too_few_options_is_invalid() {
        let (svc, _) = service();
        let content = QuizContent::Structured(serde_json::json!([
            {"questionText": "Pick", "options": ["only"]}
        ]));
        let start = svc.start_from_content(LessonId::new(9), &content);
        assert!(
            matches!(
                start,
                QuizStart::Unavailable(QuizUnavailable::Invalid(
                    InvalidQuizError::TooFewOptions { count: 1, .. }
                ))
            ),
            "{start:?}"
        );
    }

    #[test]
    fn undecodable_payload_is_coming_soon() {
        let (svc, _) = service();
        let content = QuizContent::Structured(serde_json::json!([{"options": ["a", "b"]}]));
        let start = svc.start_from_content(LessonId::new(9), &content);
        assert_eq!(
            start,
            QuizStart::Unavailable(QuizUnavailable::ComingSoon { note: None })
        );
    }

    #[tokio::test]
    async fn submit_persists_once_and_retake_clears_attempt() {
        let (svc, repo) = service();
        let mut run = ready(&svc, 102).await;
        run.select_answer(0, 1).unwrap();

        let first = svc.submit(&mut run).await.unwrap();
        assert_eq!(first.result.correct_count(), 1);
        assert_eq!(first.result.score_percent(), 50);

        let again = svc.submit(&mut run).await.unwrap();
        assert_eq!(again, first);
        assert_eq!(repo.list_attempts(LessonId::new(102), 10).await.unwrap().len(), 1);

        svc.retake(&mut run);
        assert!(run.attempt_id().is_none());
        assert!(!run.is_completed());
        assert_eq!(run.session().answered_count(), 0);

        run.select_answer(0, 1).unwrap();
        run.select_answer(1, 1).unwrap();
        let second = svc.submit(&mut run).await.unwrap();
        assert_eq!(second.result.score_percent(), 100);
        assert_ne!(second.attempt_id, first.attempt_id);
        assert_eq!(repo.list_attempts(LessonId::new(102), 10).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn finalize_before_submit_is_an_error() {
        let (svc, _) = service();
        let mut run = ready(&svc, 102).await;
        assert!(matches!(
            svc.finalize_attempt(&mut run).await,
            Err(QuizError::NotSubmitted)
        ));
    }

    struct FailingRepo;

    #[async_trait::async_trait]
    impl QuizAttemptRepository for FailingRepo {
        async fn append_attempt(&self, _: &QuizAttempt) -> Result<AttemptId, StorageError> {
            Err(StorageError::Connection("offline".into()))
        }

        async fn get_attempt(&self, _: AttemptId) -> Result<QuizAttempt, StorageError> {
            Err(StorageError::NotFound)
        }

        async fn list_attempts(
            &self,
            _: LessonId,
            _: u32,
        ) -> Result<Vec<AttemptRow>, StorageError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn storage_failure_leaves_run_submitted_without_attempt() {
        let svc = service_with(Arc::new(FailingRepo));
        let mut run = ready(&svc, 102).await;
        let err = svc.submit(&mut run).await.unwrap_err();
        assert!(matches!(err, QuizError::Storage(_)));
        assert!(run.is_completed());
        assert!(run.attempt_id().is_none());
    }
}
