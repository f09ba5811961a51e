use thiserror::Error;

use crate::model::QuestionId;

/// Structural problems in quiz data handed over by a provider.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizDataError {
    #[error("question {0} appears more than once in the quiz")]
    DuplicateQuestion(QuestionId),

    #[error("free-text question {id} lists {count} choices")]
    ChoicesOnFreeText { id: QuestionId, count: usize },

    #[error("passing score {0}% is above 100%")]
    PassingScoreOutOfRange(u8),
}
