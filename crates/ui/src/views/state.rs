use dioxus::prelude::*;

use services::{CourseError, CourseSourceError, QuizError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    Unknown,
    NotFound,
    QuizUnavailable,
}

impl ViewError {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Unknown => "Something went wrong. Please try again.",
            Self::NotFound => "This page could not be found.",
            Self::QuizUnavailable => "This quiz content is not available.",
        }
    }

    #[must_use]
    pub fn is_retryable(self) -> bool {
        matches!(self, Self::Unknown)
    }

    #[must_use]
    pub fn from_course(err: &CourseError) -> Self {
        match err {
            CourseError::LessonNotFound(_) | CourseError::Source(CourseSourceError::NotFound) => {
                Self::NotFound
            }
            _ => Self::Unknown,
        }
    }

    #[must_use]
    pub fn from_quiz(err: &QuizError) -> Self {
        match err {
            QuizError::Course(course) => Self::from_course(course),
            QuizError::NotAQuiz(_) => Self::NotFound,
            _ => Self::Unknown,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Error(ViewError),
}

#[must_use]
pub fn view_state_from_resource<T: Clone>(
    resource: &Resource<Result<T, ViewError>>,
) -> ViewState<T> {
    match resource.state().cloned() {
        UseResourceState::Pending => ViewState::Loading,
        UseResourceState::Ready => match resource.value().read().as_ref() {
            Some(Ok(data)) => ViewState::Ready(data.clone()),
            Some(Err(err)) => ViewState::Error(*err),
            None => ViewState::Error(ViewError::Unknown),
        },
        UseResourceState::Paused | UseResourceState::Stopped => ViewState::Idle,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use course_core::model::LessonId;

    #[test]
    fn missing_content_maps_to_not_found() {
        let err = CourseError::LessonNotFound(LessonId::new(3));
        assert_eq!(ViewError::from_course(&err), ViewError::NotFound);
        let err = QuizError::Course(CourseError::Source(CourseSourceError::NotFound));
        assert_eq!(ViewError::from_quiz(&err), ViewError::NotFound);
        assert_eq!(ViewError::from_quiz(&QuizError::NotSubmitted), ViewError::Unknown);
    }

    #[test]
    fn only_unknown_errors_offer_retry() {
        assert!(ViewError::Unknown.is_retryable());
        assert!(!ViewError::NotFound.is_retryable());
        assert!(!ViewError::QuizUnavailable.is_retryable());
    }
}
