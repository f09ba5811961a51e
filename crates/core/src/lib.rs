#![forbid(unsafe_code)]

pub mod answers;
pub mod error;
pub mod model;
pub mod navigation;
pub mod time;
pub mod timer;

pub use answers::{AnswerEntry, AnswerStore};
pub use error::QuizDataError;
pub use navigation::Cursor;
pub use time::Clock;
pub use timer::{Countdown, TimerEvent, TimerState};
