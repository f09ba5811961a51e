use serde::{Deserialize, Serialize};

use crate::error::QuizDataError;
use crate::model::QuizId;

/// Time allowed for one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeLimit {
    #[default]
    Unlimited,
    Minutes(u32),
}

impl TimeLimit {
    /// Interpret a provider time limit: zero, negative or absent means unlimited.
    #[must_use]
    pub fn from_minutes(raw: Option<i64>) -> Self {
        match raw {
            Some(minutes) if minutes > 0 => {
                Self::Minutes(u32::try_from(minutes).unwrap_or(u32::MAX))
            }
            _ => Self::Unlimited,
        }
    }

    /// Countdown duration in seconds; `0` for unlimited.
    #[must_use]
    pub fn as_seconds(self) -> i64 {
        match self {
            Self::Unlimited => 0,
            Self::Minutes(minutes) => i64::from(minutes) * 60,
        }
    }

    #[must_use]
    pub fn is_unlimited(self) -> bool {
        matches!(self, Self::Unlimited)
    }
}

/// Quiz metadata the session engine cares about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizMeta {
    pub id: QuizId,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "time_limit", default)]
    pub time_limit_minutes: Option<i64>,
    #[serde(default = "default_passing_score")]
    pub passing_score: u8,
    #[serde(rename = "questions_count", default)]
    pub question_count: u32,
    #[serde(default)]
    pub total_points: u32,
}

fn default_passing_score() -> u8 {
    60
}

impl QuizMeta {
    #[must_use]
    pub fn new(id: QuizId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            time_limit_minutes: None,
            passing_score: default_passing_score(),
            question_count: 0,
            total_points: 0,
        }
    }

    #[must_use]
    pub fn with_time_limit_minutes(mut self, minutes: i64) -> Self {
        self.time_limit_minutes = Some(minutes);
        self
    }

    #[must_use]
    pub fn time_limit(&self) -> TimeLimit {
        TimeLimit::from_minutes(self.time_limit_minutes)
    }

    #[must_use]
    pub fn is_passing(&self, score: f64) -> bool {
        score >= f64::from(self.passing_score)
    }

    /// # Errors
    ///
    /// Returns `QuizDataError::PassingScoreOutOfRange` if the passing score exceeds 100.
    pub fn validate(&self) -> Result<(), QuizDataError> {
        if self.passing_score > 100 {
            return Err(QuizDataError::PassingScoreOutOfRange(self.passing_score));
        }
        Ok(())
    }
}
