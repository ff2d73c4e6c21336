mod attempt_vm;
mod course_vm;
mod markdown_vm;
mod quiz_vm;
mod time_fmt;

pub use attempt_vm::{
    AttemptCardVm, AttemptDetailVm, map_attempt_card, map_attempt_cards, map_attempt_detail,
};
pub use course_vm::{
    LessonBodyVm, LessonLinkVm, LessonRowVm, LessonVm, ModuleVm, OutlineVm, map_lesson,
    map_outline,
};
pub use markdown_vm::{inline_markdown_to_html, markdown_to_html, sanitize_html};
pub use quiz_vm::{
    OptionState, OptionVm, QuestionPillVm, QuestionVm, QuizIntent, QuizOutcome, QuizResultVm,
    QuizVm,
};
pub use time_fmt::{format_datetime, format_duration};
