use serde::Serialize;

use quiz_core::model::FlashcardId;

use super::session::{CardFace, FlashcardReviewSession};

/// Snapshot of a review pass for the display layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlashcardView {
    pub card_id: Option<FlashcardId>,
    pub face: CardFace,
    /// Text on the side that is showing.
    pub text: Option<String>,
    pub hint: Option<String>,
    pub position: usize,
    pub total: usize,
    pub viewed: usize,
    pub current_viewed: bool,
    pub percent: f64,
}

impl FlashcardView {
    #[must_use]
    pub fn from_session(session: &FlashcardReviewSession) -> Self {
        let card = session.current_card();
        Self {
            card_id: card.map(|c| c.id),
            face: session.face(),
            text: card.map(|c| match session.face() {
                CardFace::Front => c.front.clone(),
                CardFace::Back => c.back.clone(),
            }),
            hint: card.and_then(|c| c.hint.clone()),
            position: session.position(),
            total: session.total(),
            viewed: session.viewed_count(),
            current_viewed: session.is_viewed(session.position()),
            percent: session.progress_percent(),
        }
    }
}
