mod course;
mod ids;
mod question;
mod result;
mod session;

pub use course::{Course, CourseModule, Lesson, LessonKind, QuizContent};
pub use ids::{CourseId, LessonId, ModuleId, ParseIdError};
pub use question::{InvalidQuizError, QuestionDraft, QuizQuestion, validate_questions};
pub use result::{QuizAttempt, QuizAttemptError, QuizResult, score_percent};
pub use session::{AnswerFeedback, QuizSession, QuizSessionError};
