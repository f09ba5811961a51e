use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::model::{Question, QuestionId};

/// One `{question_id, answer}` pair of a submission batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerEntry {
    pub question_id: QuestionId,
    pub answer: String,
}

/// Draft answers for one session, keyed by question.
///
/// Only questions the store was built with are accepted, so a snapshot always has
/// exactly one entry per question, in question order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerStore {
    order: Vec<QuestionId>,
    drafts: HashMap<QuestionId, String>,
}

impl AnswerStore {
    /// Build a store for the given question ids. Repeated ids keep their first position.
    #[must_use]
    pub fn new(question_ids: impl IntoIterator<Item = QuestionId>) -> Self {
        let mut order = Vec::new();
        let mut drafts = HashMap::new();
        for id in question_ids {
            if drafts.insert(id, String::new()).is_none() {
                order.push(id);
            }
        }
        Self { order, drafts }
    }

    #[must_use]
    pub fn for_questions(questions: &[Question]) -> Self {
        Self::new(questions.iter().map(Question::id))
    }

    /// Replace the draft for `question_id`. Returns false for an unknown question.
    pub fn set_answer(&mut self, question_id: QuestionId, text: impl Into<String>) -> bool {
        match self.drafts.get_mut(&question_id) {
            Some(slot) => {
                *slot = text.into();
                true
            }
            None => false,
        }
    }

    /// Current draft, or `""` if nothing was recorded.
    #[must_use]
    pub fn answer(&self, question_id: QuestionId) -> &str {
        self.drafts.get(&question_id).map_or("", String::as_str)
    }

    #[must_use]
    pub fn is_answered(&self, question_id: QuestionId) -> bool {
        !self.answer(question_id).trim().is_empty()
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.order.iter().filter(|id| self.is_answered(**id)).count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Every question with its current draft, unanswered ones included as `""`.
    #[must_use]
    pub fn snapshot(&self) -> Vec<AnswerEntry> {
        self.order
            .iter()
            .map(|id| AnswerEntry {
                question_id: *id,
                answer: self.answer(*id).to_owned(),
            })
            .collect()
    }
}
