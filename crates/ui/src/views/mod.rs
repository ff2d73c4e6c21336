mod attempt;
mod history;
mod home;
mod lesson;
mod quiz;
mod state;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use attempt::AttemptView;
pub use history::HistoryView;
pub use home::HomeView;
pub use lesson::LessonView;
pub use quiz::QuizPanel;
pub use state::{ViewError, ViewState, view_state_from_resource};
