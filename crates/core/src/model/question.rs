use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::QuizDataError;
use crate::model::QuestionId;

//
// ─── QUESTION KIND ─────────────────────────────────────────────────────────────
//

/// How a question expects to be answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestionKind {
    #[serde(rename = "qcm")]
    SingleChoice,
    #[serde(rename = "vf")]
    TrueFalse,
    #[serde(rename = "ouvert")]
    OpenText,
    #[serde(rename = "completion")]
    FillInBlank,
}

impl QuestionKind {
    /// Choice-based questions are answered by picking one of the listed choices.
    #[must_use]
    pub fn is_choice_based(self) -> bool {
        matches!(self, Self::SingleChoice | Self::TrueFalse)
    }

    #[must_use]
    pub fn is_free_text(self) -> bool {
        !self.is_choice_based()
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A quiz question as delivered by the quiz provider.
///
/// Questions are immutable once loaded into a session. Grading data such as the
/// correct answer is never part of this type; scoring belongs to the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    id: QuestionId,
    #[serde(rename = "question_type")]
    kind: QuestionKind,
    #[serde(rename = "text")]
    prompt: String,
    #[serde(default)]
    choices: Vec<String>,
    #[serde(default = "default_points")]
    points: u32,
    #[serde(rename = "order", default)]
    position: u32,
}

fn default_points() -> u32 {
    1
}

impl Question {
    /// Build a question, checking that free-text kinds carry no choices.
    ///
    /// # Errors
    ///
    /// Returns `QuizDataError::ChoicesOnFreeText` for open-text or fill-in questions with choices.
    pub fn new(
        id: QuestionId,
        kind: QuestionKind,
        prompt: impl Into<String>,
        choices: Vec<String>,
        points: u32,
        position: u32,
    ) -> Result<Self, QuizDataError> {
        if kind.is_free_text() && !choices.is_empty() {
            return Err(QuizDataError::ChoicesOnFreeText {
                id,
                count: choices.len(),
            });
        }
        Ok(Self {
            id,
            kind,
            prompt: prompt.into(),
            choices,
            points,
            position,
        })
    }

    #[must_use]
    pub fn single_choice<I, S>(id: QuestionId, prompt: impl Into<String>, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id,
            kind: QuestionKind::SingleChoice,
            prompt: prompt.into(),
            choices: choices.into_iter().map(Into::into).collect(),
            points: default_points(),
            position: 0,
        }
    }

    #[must_use]
    pub fn true_false(id: QuestionId, prompt: impl Into<String>) -> Self {
        Self {
            id,
            kind: QuestionKind::TrueFalse,
            prompt: prompt.into(),
            choices: vec!["true".to_owned(), "false".to_owned()],
            points: default_points(),
            position: 0,
        }
    }

    #[must_use]
    pub fn open_text(id: QuestionId, prompt: impl Into<String>) -> Self {
        Self::free_text(id, QuestionKind::OpenText, prompt)
    }

    #[must_use]
    pub fn fill_in_blank(id: QuestionId, prompt: impl Into<String>) -> Self {
        Self::free_text(id, QuestionKind::FillInBlank, prompt)
    }

    fn free_text(id: QuestionId, kind: QuestionKind, prompt: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            prompt: prompt.into(),
            choices: Vec::new(),
            points: default_points(),
            position: 0,
        }
    }

    #[must_use]
    pub fn with_points(mut self, points: u32) -> Self {
        self.points = points;
        self
    }

    #[must_use]
    pub fn at_position(mut self, position: u32) -> Self {
        self.position = position;
        self
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn kind(&self) -> QuestionKind {
        self.kind
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    #[must_use]
    pub fn points(&self) -> u32 {
        self.points
    }

    #[must_use]
    pub fn position(&self) -> u32 {
        self.position
    }
}

/// Check a loaded question list: ids must be unique and free-text questions must not list choices.
///
/// # Errors
///
/// Returns the first `QuizDataError` found, in question order.
pub fn validate_questions(questions: &[Question]) -> Result<(), QuizDataError> {
    let mut seen = HashSet::with_capacity(questions.len());
    for question in questions {
        if !seen.insert(question.id) {
            return Err(QuizDataError::DuplicateQuestion(question.id));
        }
        if question.kind.is_free_text() && !question.choices.is_empty() {
            return Err(QuizDataError::ChoicesOnFreeText {
                id: question.id,
                count: question.choices.len(),
            });
        }
    }
    Ok(())
}
