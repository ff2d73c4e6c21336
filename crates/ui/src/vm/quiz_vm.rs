use course_core::model::{
    AnswerFeedback, QuizQuestion, QuizResult, QuizSessionError, score_percent,
};
use services::{AttemptId, QuizError, QuizLoopService, QuizRun, QuizSubmission};

use crate::views::ViewError;
use crate::vm::markdown_vm::{inline_markdown_to_html, markdown_to_html};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizIntent {
    Select(usize),
    Next,
    Previous,
    GoTo(usize),
    Submit,
    Retake,
}

/// How an option button is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionState {
    Idle,
    /// Chosen on an ungraded question.
    Selected,
    SelectedCorrect,
    SelectedWrong,
    /// Not chosen, but the right answer after a wrong pick.
    RevealCorrect,
}

impl OptionState {
    #[must_use]
    pub fn class(self) -> &'static str {
        match self {
            Self::Idle => "quiz-option",
            Self::Selected => "quiz-option selected",
            Self::SelectedCorrect => "quiz-option selected correct",
            Self::SelectedWrong => "quiz-option selected wrong",
            Self::RevealCorrect => "quiz-option reveal",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub index: usize,
    pub letter: char,
    pub html: String,
    pub state: OptionState,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionVm {
    pub index: usize,
    pub number: u32,
    pub position_label: String,
    pub text_html: String,
    pub marks: u32,
    pub options: Vec<OptionVm>,
    pub feedback: AnswerFeedback,
    pub locked: bool,
    pub explanation_html: Option<String>,
}

/// One entry in the question strip.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuestionPillVm {
    pub index: usize,
    pub number: u32,
    pub answered: bool,
    pub current: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizResultVm {
    pub answered: u32,
    pub total: u32,
    pub correct: u32,
    pub unanswered: u32,
    pub score_percent: u8,
    pub marks_awarded: u32,
    pub marks_total: u32,
    pub attempt_id: Option<AttemptId>,
}

impl QuizResultVm {
    fn from_result(result: &QuizResult, attempt_id: Option<AttemptId>) -> Self {
        Self {
            answered: result.answered_count(),
            total: result.total_count(),
            correct: result.correct_count(),
            unanswered: result.unanswered_count(),
            score_percent: result.score_percent(),
            marks_awarded: result.marks_awarded(),
            marks_total: result.marks_total(),
            attempt_id,
        }
    }

    #[must_use]
    pub fn is_saved(&self) -> bool {
        self.attempt_id.is_some()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizOutcome {
    Continue,
    Submitted { attempt_id: Option<AttemptId> },
}

/// View model over a running quiz.
#[derive(Clone, Debug, PartialEq)]
pub struct QuizVm {
    run: QuizRun,
    submission: Option<QuizSubmission>,
}

impl QuizVm {
    #[must_use]
    pub fn new(run: QuizRun) -> Self {
        Self {
            run,
            submission: None,
        }
    }

    #[must_use]
    pub fn run(&self) -> &QuizRun {
        &self.run
    }

    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.run.is_completed()
    }

    #[must_use]
    pub fn can_go_previous(&self) -> bool {
        !self.run.session().is_first()
    }

    #[must_use]
    pub fn can_go_next(&self) -> bool {
        !self.run.session().is_last()
    }

    #[must_use]
    pub fn progress_percent(&self) -> u8 {
        let session = self.run.session();
        let answered = u32::try_from(session.answered_count()).unwrap_or(u32::MAX);
        let total = u32::try_from(session.len()).unwrap_or(u32::MAX);
        score_percent(answered, total)
    }

    #[must_use]
    pub fn answered_label(&self) -> String {
        let session = self.run.session();
        format!("{} of {} answered", session.answered_count(), session.len())
    }

    #[must_use]
    pub fn current_question(&self) -> QuestionVm {
        let session = self.run.session();
        let index = session.current_index();
        self.question_vm(index, session.current_question())
    }

    fn question_vm(&self, index: usize, question: &QuizQuestion) -> QuestionVm {
        let session = self.run.session();
        let feedback = session.feedback(index);
        let chosen = session.answer_for(index);
        let locked = session.is_locked(index);

        let options = question
            .options()
            .iter()
            .enumerate()
            .map(|(option, text)| OptionVm {
                index: option,
                letter: option_letter(option),
                html: inline_markdown_to_html(text),
                state: option_state(feedback, chosen == Some(option), question, option),
            })
            .collect();

        QuestionVm {
            index,
            number: question.number(),
            position_label: format!("Question {} of {}", index + 1, session.len()),
            text_html: markdown_to_html(question.text()),
            marks: question.marks(),
            options,
            feedback,
            locked,
            explanation_html: question
                .explanation()
                .filter(|_| locked)
                .map(markdown_to_html),
        }
    }

    #[must_use]
    pub fn pills(&self) -> Vec<QuestionPillVm> {
        let session = self.run.session();
        session
            .questions()
            .iter()
            .enumerate()
            .map(|(index, question)| QuestionPillVm {
                index,
                number: question.number(),
                answered: session.is_answered(index),
                current: index == session.current_index(),
            })
            .collect()
    }

    /// Result of the submitted run; `None` while playing.
    #[must_use]
    pub fn result(&self) -> Option<QuizResultVm> {
        if !self.is_submitted() {
            return None;
        }
        let attempt_id = self.run.attempt_id();
        let result = self
            .submission
            .as_ref()
            .map_or_else(|| self.run.session().result(), |submission| submission.result);
        Some(QuizResultVm::from_result(&result, attempt_id))
    }

    /// Apply a learner action.
    ///
    /// Picking an option on an already answered question is ignored.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::Unknown` when the attempt cannot be saved; the run
    /// stays submitted and submitting again retries the save.
    pub async fn apply(
        &mut self,
        quiz_loop: &QuizLoopService,
        intent: QuizIntent,
    ) -> Result<QuizOutcome, ViewError> {
        match intent {
            QuizIntent::Select(option) => {
                let index = self.run.session().current_index();
                match self.run.select_answer(index, option) {
                    Ok(_)
                    | Err(
                        QuizSessionError::AlreadyAnswered { .. } | QuizSessionError::Completed,
                    ) => {}
                    Err(err) => {
                        tracing::warn!(error = %err, "rejected quiz selection");
                        return Err(ViewError::Unknown);
                    }
                }
            }
            QuizIntent::Next => self.run.next(),
            QuizIntent::Previous => self.run.previous(),
            QuizIntent::GoTo(index) => self.run.go_to(index),
            QuizIntent::Submit => return self.submit(quiz_loop).await,
            QuizIntent::Retake => {
                quiz_loop.retake(&mut self.run);
                self.submission = None;
            }
        }
        Ok(QuizOutcome::Continue)
    }

    async fn submit(&mut self, quiz_loop: &QuizLoopService) -> Result<QuizOutcome, ViewError> {
        match quiz_loop.submit(&mut self.run).await {
            Ok(submission) => {
                let attempt_id = submission.attempt_id;
                self.submission = Some(submission);
                Ok(QuizOutcome::Submitted { attempt_id })
            }
            Err(QuizError::Storage(err)) => {
                tracing::warn!(error = %err, "quiz result not saved");
                Err(ViewError::Unknown)
            }
            Err(_) => Err(ViewError::Unknown),
        }
    }
}

fn option_letter(index: usize) -> char {
    u8::try_from(index)
        .ok()
        .filter(|i| *i < 26)
        .map_or('?', |i| char::from(b'A' + i))
}

fn option_state(
    feedback: AnswerFeedback,
    chosen: bool,
    question: &QuizQuestion,
    option: usize,
) -> OptionState {
    match (feedback, chosen) {
        (AnswerFeedback::Unanswered, _) => OptionState::Idle,
        (AnswerFeedback::Ungraded, true) => OptionState::Selected,
        (AnswerFeedback::Correct, true) => OptionState::SelectedCorrect,
        (AnswerFeedback::Incorrect, true) => OptionState::SelectedWrong,
        (AnswerFeedback::Incorrect, false) if question.is_correct_option(option) => {
            OptionState::RevealCorrect
        }
        _ => OptionState::Idle,
    }
}
