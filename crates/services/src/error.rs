//! Shared error types for the services crate.

use thiserror::Error;

use providers::ProviderError;
use quiz_core::QuizDataError;

/// Errors emitted by quiz and flashcard sessions.
///
/// Commands that arrive in the wrong state or run past the ends of a sequence are not
/// errors; they are absorbed as no-ops by the sessions themselves.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("could not load the session: {0}")]
    Load(#[source] ProviderError),
    #[error("submission failed: {0}")]
    Submission(#[source] ProviderError),
    #[error(transparent)]
    InvalidQuiz(#[from] QuizDataError),
}

impl SessionError {
    /// Only a failed submission can be retried on the same session.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Submission(_))
    }

    /// Human-readable message, taken from the collaborator when it supplied one.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Load(err) | Self::Submission(err) => err.message(),
            Self::InvalidQuiz(err) => err.to_string(),
        }
    }
}
