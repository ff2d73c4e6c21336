mod history;
mod run;
mod workflow;

// Public API of the quiz subsystem.
pub use crate::error::{AttemptError, QuizError};
pub use history::{AttemptListItem, QuizAttemptService};
pub use run::{QuizRun, QuizStart, QuizSubmission, QuizUnavailable};
pub use workflow::QuizLoopService;
