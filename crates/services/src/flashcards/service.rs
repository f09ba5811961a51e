use std::sync::Arc;
use tracing::{info, warn};

use providers::FlashcardProvider;
use quiz_core::model::QuizId;

use crate::error::SessionError;

use super::session::FlashcardReviewSession;

/// Loads flashcard decks into review sessions.
#[derive(Clone)]
pub struct FlashcardService {
    cards: Arc<dyn FlashcardProvider>,
}

impl FlashcardService {
    #[must_use]
    pub fn new(cards: Arc<dyn FlashcardProvider>) -> Self {
        Self { cards }
    }

    /// Fetch the quiz's flashcards and open a review pass over them, in provider order.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Load` if the provider fails.
    pub async fn start(&self, quiz_id: QuizId) -> Result<FlashcardReviewSession, SessionError> {
        let cards = self.cards.flashcards(quiz_id).await.map_err(|err| {
            warn!(%quiz_id, error = %err, "could not load flashcards");
            SessionError::Load(err)
        })?;
        info!(%quiz_id, cards = cards.len(), "flashcard review started");
        Ok(FlashcardReviewSession::new(quiz_id, cards))
    }
}
