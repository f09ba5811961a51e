use serde::Serialize;

/// Aggregated view of attempt progress, useful for progress bars and question dots.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuizProgress {
    pub total: usize,
    pub answered: usize,
    pub unanswered: usize,
    /// Zero-based index of the question being shown.
    pub position: usize,
    pub percent: f64,
}
