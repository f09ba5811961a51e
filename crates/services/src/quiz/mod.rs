mod progress;
mod service;
mod session;
mod view;

// Public API of the quiz attempt subsystem.
pub use crate::error::SessionError;
pub use progress::QuizProgress;
pub use service::{QuizSessionService, SubmitOutcome};
pub use session::{
    FailureKind, QuizAttemptSession, SessionFailure, SessionStatus, SubmitTrigger, TickOutcome,
};
pub use view::{QuestionView, QuizSessionView, RemainingTime};
