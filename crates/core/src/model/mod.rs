mod attempt;
mod flashcard;
mod ids;
mod question;
mod quiz;

pub use ids::{AttemptId, FlashcardId, ParseIdError, QuestionId, QuizId};

pub use attempt::{Attempt, AttemptStatus, GradedAnswer};
pub use flashcard::Flashcard;
pub use question::{Question, QuestionKind, validate_questions};
pub use quiz::{QuizMeta, TimeLimit};
