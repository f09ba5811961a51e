use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use quiz_core::model::{Attempt, Flashcard, Question, QuizId, QuizMeta};
use quiz_core::AnswerEntry;

use crate::error::ProviderError;

/// A new attempt together with the questions to ask, in the order to ask them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartedAttempt {
    pub attempt: Attempt,
    pub questions: Vec<Question>,
}

/// Everything sent when an attempt is submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionBatch {
    pub answers: Vec<AnswerEntry>,
    #[serde(rename = "time_spent")]
    pub time_spent_seconds: u64,
}

/// Quiz-side collaborator: issues attempts and scores submissions.
#[async_trait]
pub trait QuizProvider: Send + Sync {
    /// Start a new attempt for a quiz.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` if the attempt cannot be created.
    async fn start_attempt(&self, quiz_id: QuizId) -> Result<StartedAttempt, ProviderError>;

    /// Fetch quiz metadata, including the time limit.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::NotFound` if the quiz is missing, or other provider errors.
    async fn quiz_meta(&self, quiz_id: QuizId) -> Result<QuizMeta, ProviderError>;

    /// Submit all answers of the in-progress attempt and return the scored attempt.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` if the submission is not accepted.
    async fn submit_attempt(
        &self,
        quiz_id: QuizId,
        batch: &SubmissionBatch,
    ) -> Result<Attempt, ProviderError>;
}

#[async_trait]
pub trait FlashcardProvider: Send + Sync {
    /// Fetch the flashcards generated for a quiz. The list may be empty.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` if the cards cannot be fetched.
    async fn flashcards(&self, quiz_id: QuizId) -> Result<Vec<Flashcard>, ProviderError>;
}
