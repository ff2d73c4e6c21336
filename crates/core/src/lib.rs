#![forbid(unsafe_code)]

pub mod model;
pub mod parse;
pub mod time;

pub use parse::{QuizPayload, parse_quiz_content, parse_quiz_text};
pub use time::Clock;
