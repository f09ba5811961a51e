use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;
use std::collections::BTreeSet;

use quiz_core::Cursor;
use quiz_core::model::{Flashcard, QuizId};

/// Which side of the current card is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CardFace {
    Front,
    Back,
}

/// Self-study pass over a quiz's flashcards.
///
/// There is no submission and no timer. A card counts as viewed once its back has been
/// shown; the viewed set only shrinks on `reset` or `shuffle`.
#[derive(Debug, Clone)]
pub struct FlashcardReviewSession {
    quiz_id: QuizId,
    cards: Vec<Flashcard>,
    cursor: Cursor,
    viewed: BTreeSet<usize>,
    face: CardFace,
}

impl FlashcardReviewSession {
    #[must_use]
    pub fn new(quiz_id: QuizId, cards: Vec<Flashcard>) -> Self {
        Self {
            quiz_id,
            cursor: Cursor::new(cards.len()),
            cards,
            viewed: BTreeSet::new(),
            face: CardFace::Front,
        }
    }

    /// Turn the current card over. Showing the back marks the card as viewed.
    pub fn flip(&mut self) -> CardFace {
        if self.cards.is_empty() {
            return self.face;
        }
        self.face = match self.face {
            CardFace::Front => CardFace::Back,
            CardFace::Back => CardFace::Front,
        };
        if self.face == CardFace::Back {
            self.viewed.insert(self.cursor.current());
        }
        self.face
    }

    pub fn next(&mut self) -> bool {
        self.face = CardFace::Front;
        self.cursor.next()
    }

    pub fn previous(&mut self) -> bool {
        self.face = CardFace::Front;
        self.cursor.previous()
    }

    pub fn go_to(&mut self, index: usize) -> bool {
        self.face = CardFace::Front;
        self.cursor.go_to(index)
    }

    /// Deal the same cards in a new random order and start a fresh pass.
    pub fn shuffle(&mut self) {
        self.shuffle_with(&mut rand::rng());
    }

    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.as_mut_slice().shuffle(rng);
        self.restart();
    }

    /// Back to the first card with no progress, keeping the current order.
    pub fn reset(&mut self) {
        self.restart();
    }

    fn restart(&mut self) {
        self.cursor.reset();
        self.face = CardFace::Front;
        self.viewed.clear();
    }

    #[must_use]
    pub fn quiz_id(&self) -> QuizId {
        self.quiz_id
    }

    #[must_use]
    pub fn cards(&self) -> &[Flashcard] {
        &self.cards
    }

    #[must_use]
    pub fn current_card(&self) -> Option<&Flashcard> {
        self.cards.get(self.cursor.current())
    }

    #[must_use]
    pub fn face(&self) -> CardFace {
        self.face
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.cursor.current()
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_viewed(&self, index: usize) -> bool {
        self.viewed.contains(&index)
    }

    #[must_use]
    pub fn viewed_count(&self) -> usize {
        self.viewed.len()
    }

    #[must_use]
    pub fn progress_percent(&self) -> f64 {
        self.cursor.progress_percent()
    }
}
