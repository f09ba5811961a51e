#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod http;
pub mod memory;
pub mod provider;

pub use config::ProviderConfig;
pub use error::ProviderError;
pub use http::HttpQuizProvider;
pub use memory::{InMemoryProvider, SeededQuestion};
pub use provider::{FlashcardProvider, QuizProvider, StartedAttempt, SubmissionBatch};
