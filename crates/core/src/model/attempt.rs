use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::model::{AttemptId, QuestionId, QuizId};

/// Server-side status of an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttemptStatus {
    #[serde(rename = "in_progress")]
    InProgress,
    #[serde(rename = "completed", alias = "submitted")]
    Submitted,
    #[serde(rename = "abandoned")]
    Abandoned,
}

/// Grading detail for one submitted answer, as produced by the scoring collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradedAnswer {
    #[serde(rename = "question")]
    pub question_id: QuestionId,
    #[serde(default)]
    pub question_text: String,
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub is_correct: bool,
    #[serde(default)]
    pub points_earned: u32,
    #[serde(default)]
    pub correct_answer: String,
    #[serde(default)]
    pub explanation: String,
}

/// One attempt at a quiz.
///
/// While `status` is `InProgress` the score fields are zero and `answers` is empty.
/// After submission the provider fills them in; the engine never recomputes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attempt {
    pub id: AttemptId,
    #[serde(rename = "quiz", deserialize_with = "quiz_reference")]
    pub quiz_id: QuizId,
    pub status: AttemptStatus,
    #[serde(rename = "time_spent", default)]
    pub time_spent_seconds: u64,
    /// Score percentage in `0.0..=100.0`.
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub points_earned: u32,
    #[serde(default)]
    pub total_points: u32,
    #[serde(rename = "correct_answers", default)]
    pub correct_count: u32,
    #[serde(default)]
    pub total_questions: u32,
    #[serde(default)]
    pub is_passed: bool,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub answers: Vec<GradedAnswer>,
}

impl Attempt {
    /// A freshly started attempt with nothing graded yet.
    #[must_use]
    pub fn started(
        id: AttemptId,
        quiz_id: QuizId,
        total_questions: u32,
        total_points: u32,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            quiz_id,
            status: AttemptStatus::InProgress,
            time_spent_seconds: 0,
            score: 0.0,
            points_earned: 0,
            total_points,
            correct_count: 0,
            total_questions,
            is_passed: false,
            started_at: Some(started_at),
            completed_at: None,
            answers: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.status == AttemptStatus::Submitted
    }

    /// Grading detail for a single question, if the provider returned one.
    #[must_use]
    pub fn graded(&self, question_id: QuestionId) -> Option<&GradedAnswer> {
        self.answers.iter().find(|a| a.question_id == question_id)
    }
}

// Scored attempts embed the whole quiz; in-progress ones carry only its id.
fn quiz_reference<'de, D>(deserializer: D) -> Result<QuizId, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum QuizRef {
        Id(QuizId),
        Nested { id: QuizId },
    }

    Ok(match QuizRef::deserialize(deserializer)? {
        QuizRef::Id(id) | QuizRef::Nested { id } => id,
    })
}
