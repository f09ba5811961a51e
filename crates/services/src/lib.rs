#![forbid(unsafe_code)]

pub mod error;
pub mod flashcards;
pub mod quiz;
pub mod ticker;

pub use quiz_core::Clock;

pub use error::SessionError;
pub use flashcards::{CardFace, FlashcardReviewSession, FlashcardService, FlashcardView};
pub use quiz::{
    FailureKind, QuizAttemptSession, QuizProgress, QuizSessionService, QuizSessionView,
    RemainingTime, SessionFailure, SessionStatus, SubmitOutcome, SubmitTrigger, TickOutcome,
};
pub use ticker::{IntervalTicker, ScriptedTicks, TickSource};
