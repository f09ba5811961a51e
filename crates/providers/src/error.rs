use thiserror::Error;

/// Errors surfaced by quiz and flashcard providers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProviderError {
    #[error("not found")]
    NotFound,

    #[error("request rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("provider unavailable: {0}")]
    Unavailable(String),
}

impl ProviderError {
    /// Human-readable message for the host, preferring the collaborator's own wording.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Rejected { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_message_is_the_collaborator_text() {
        let err = ProviderError::Rejected {
            status: 400,
            message: "No attempt in progress".into(),
        };
        assert_eq!(err.message(), "No attempt in progress");
    }

    #[test]
    fn other_variants_use_display() {
        assert_eq!(ProviderError::NotFound.message(), "not found");
    }
}
