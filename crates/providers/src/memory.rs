use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use quiz_core::Clock;
use quiz_core::model::{
    Attempt, AttemptId, AttemptStatus, Flashcard, GradedAnswer, Question, QuestionKind, QuizId,
    QuizMeta,
};

use crate::error::ProviderError;
use crate::provider::{FlashcardProvider, QuizProvider, StartedAttempt, SubmissionBatch};

/// A question plus the grading data only the provider knows about.
#[derive(Debug, Clone)]
pub struct SeededQuestion {
    pub question: Question,
    pub correct_answer: String,
    pub explanation: String,
}

impl SeededQuestion {
    #[must_use]
    pub fn new(question: Question, correct_answer: impl Into<String>) -> Self {
        Self {
            question,
            correct_answer: correct_answer.into(),
            explanation: String::new(),
        }
    }

    #[must_use]
    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = explanation.into();
        self
    }

    /// Choice answers must match exactly; free-text answers ignore case and surrounding space.
    #[must_use]
    pub fn is_correct(&self, answer: &str) -> bool {
        match self.question.kind() {
            QuestionKind::OpenText | QuestionKind::FillInBlank => {
                answer.trim().to_lowercase() == self.correct_answer.trim().to_lowercase()
            }
            QuestionKind::SingleChoice | QuestionKind::TrueFalse => answer == self.correct_answer,
        }
    }
}

#[derive(Debug, Clone)]
struct QuizRecord {
    meta: QuizMeta,
    questions: Vec<SeededQuestion>,
    flashcards: Vec<Flashcard>,
}

#[derive(Debug, Default)]
struct State {
    quizzes: HashMap<QuizId, QuizRecord>,
    open_attempts: Vec<Attempt>,
    next_attempt_id: u64,
    submissions: Vec<(QuizId, SubmissionBatch)>,
    fail_next_start: Option<ProviderError>,
    fail_next_submit: Option<ProviderError>,
}

/// In-memory quiz backend for tests, demos and prototyping.
///
/// Grades submissions locally, hands out a fresh attempt id on every start, and records
/// every batch it receives.
#[derive(Clone, Default)]
pub struct InMemoryProvider {
    clock: Clock,
    state: Arc<Mutex<State>>,
}

impl InMemoryProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, ProviderError> {
        self.state
            .lock()
            .map_err(|e| ProviderError::Unavailable(e.to_string()))
    }

    /// Register or replace a quiz. Question count and total points are derived from `questions`.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Unavailable` if the internal lock is poisoned.
    pub fn insert_quiz(
        &self,
        mut meta: QuizMeta,
        questions: Vec<SeededQuestion>,
    ) -> Result<(), ProviderError> {
        meta.question_count = u32::try_from(questions.len()).unwrap_or(u32::MAX);
        meta.total_points = questions.iter().map(|q| q.question.points()).sum();
        let mut guard = self.lock()?;
        let flashcards = guard
            .quizzes
            .remove(&meta.id)
            .map(|record| record.flashcards)
            .unwrap_or_default();
        guard.quizzes.insert(
            meta.id,
            QuizRecord {
                meta,
                questions,
                flashcards,
            },
        );
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `ProviderError::NotFound` if the quiz was never inserted.
    pub fn insert_flashcards(
        &self,
        quiz_id: QuizId,
        flashcards: Vec<Flashcard>,
    ) -> Result<(), ProviderError> {
        let mut guard = self.lock()?;
        let record = guard
            .quizzes
            .get_mut(&quiz_id)
            .ok_or(ProviderError::NotFound)?;
        record.flashcards = flashcards;
        Ok(())
    }

    /// Make the next `start_attempt` call fail with `error`.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Unavailable` if the internal lock is poisoned.
    pub fn fail_next_start(&self, error: ProviderError) -> Result<(), ProviderError> {
        self.lock()?.fail_next_start = Some(error);
        Ok(())
    }

    /// Make the next `submit_attempt` call fail with `error`.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Unavailable` if the internal lock is poisoned.
    pub fn fail_next_submit(&self, error: ProviderError) -> Result<(), ProviderError> {
        self.lock()?.fail_next_submit = Some(error);
        Ok(())
    }

    /// Every batch received so far, including rejected ones, in arrival order.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Unavailable` if the internal lock is poisoned.
    pub fn submissions(&self) -> Result<Vec<(QuizId, SubmissionBatch)>, ProviderError> {
        Ok(self.lock()?.submissions.clone())
    }
}

#[async_trait]
impl QuizProvider for InMemoryProvider {
    async fn start_attempt(&self, quiz_id: QuizId) -> Result<StartedAttempt, ProviderError> {
        let now = self.clock.now();
        let mut guard = self.lock()?;
        if let Some(err) = guard.fail_next_start.take() {
            return Err(err);
        }
        let record = guard.quizzes.get(&quiz_id).ok_or(ProviderError::NotFound)?;
        let questions: Vec<Question> = record.questions.iter().map(|q| q.question.clone()).collect();
        let total_questions = record.meta.question_count;
        let total_points = record.meta.total_points;

        guard.next_attempt_id += 1;
        let attempt = Attempt::started(
            AttemptId::new(guard.next_attempt_id),
            quiz_id,
            total_questions,
            total_points,
            now,
        );
        guard.open_attempts.push(attempt.clone());
        Ok(StartedAttempt { attempt, questions })
    }

    async fn quiz_meta(&self, quiz_id: QuizId) -> Result<QuizMeta, ProviderError> {
        let guard = self.lock()?;
        guard
            .quizzes
            .get(&quiz_id)
            .map(|record| record.meta.clone())
            .ok_or(ProviderError::NotFound)
    }

    async fn submit_attempt(
        &self,
        quiz_id: QuizId,
        batch: &SubmissionBatch,
    ) -> Result<Attempt, ProviderError> {
        let now = self.clock.now();
        let mut guard = self.lock()?;
        guard.submissions.push((quiz_id, batch.clone()));
        if let Some(err) = guard.fail_next_submit.take() {
            return Err(err);
        }
        let record = guard
            .quizzes
            .get(&quiz_id)
            .cloned()
            .ok_or(ProviderError::NotFound)?;
        // The oldest open attempt for the quiz is the one being submitted.
        let position = guard
            .open_attempts
            .iter()
            .position(|a| a.quiz_id == quiz_id)
            .ok_or_else(|| ProviderError::Rejected {
                status: 400,
                message: "No attempt in progress for this quiz".to_owned(),
            })?;
        let mut attempt = guard.open_attempts.remove(position);

        let mut graded = Vec::with_capacity(batch.answers.len());
        for entry in &batch.answers {
            let Some(seeded) = record
                .questions
                .iter()
                .find(|q| q.question.id() == entry.question_id)
            else {
                continue;
            };
            let is_correct = seeded.is_correct(&entry.answer);
            graded.push(GradedAnswer {
                question_id: entry.question_id,
                question_text: seeded.question.prompt().to_owned(),
                answer: entry.answer.clone(),
                is_correct,
                points_earned: if is_correct { seeded.question.points() } else { 0 },
                correct_answer: seeded.correct_answer.clone(),
                explanation: seeded.explanation.clone(),
            });
        }

        let correct = graded.iter().filter(|g| g.is_correct).count();
        attempt.correct_count = u32::try_from(correct).unwrap_or(u32::MAX);
        attempt.points_earned = graded.iter().map(|g| g.points_earned).sum();
        attempt.score = if attempt.total_questions > 0 {
            f64::from(attempt.correct_count) / f64::from(attempt.total_questions) * 100.0
        } else {
            0.0
        };
        attempt.is_passed = record.meta.is_passing(attempt.score);
        attempt.time_spent_seconds = batch.time_spent_seconds;
        attempt.status = AttemptStatus::Submitted;
        attempt.completed_at = Some(now);
        attempt.answers = graded;
        Ok(attempt)
    }
}

#[async_trait]
impl FlashcardProvider for InMemoryProvider {
    async fn flashcards(&self, quiz_id: QuizId) -> Result<Vec<Flashcard>, ProviderError> {
        let guard = self.lock()?;
        guard
            .quizzes
            .get(&quiz_id)
            .map(|record| record.flashcards.clone())
            .ok_or(ProviderError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::AnswerEntry;
    use quiz_core::model::{FlashcardId, QuestionId};
    use quiz_core::time::fixed_clock;

    fn seeded_provider() -> InMemoryProvider {
        let provider = InMemoryProvider::new().with_clock(fixed_clock());
        provider
            .insert_quiz(
                QuizMeta::new(QuizId::new(1), "Basics").with_time_limit_minutes(10),
                vec![
                    SeededQuestion::new(
                        Question::single_choice(QuestionId::new(1), "Pick", ["A", "B"]),
                        "B",
                    ),
                    SeededQuestion::new(Question::fill_in_blank(QuestionId::new(2), "___"), "Rust")
                        .with_explanation("the language"),
                    SeededQuestion::new(
                        Question::true_false(QuestionId::new(3), "T?").with_points(2),
                        "true",
                    ),
                ],
            )
            .unwrap();
        provider
    }

    fn entry(id: u64, answer: &str) -> AnswerEntry {
        AnswerEntry {
            question_id: QuestionId::new(id),
            answer: answer.to_owned(),
        }
    }

    #[tokio::test]
    async fn starts_distinct_attempts() {
        let provider = seeded_provider();
        let first = provider.start_attempt(QuizId::new(1)).await.unwrap();
        let second = provider.start_attempt(QuizId::new(1)).await.unwrap();
        assert_ne!(first.attempt.id, second.attempt.id);
        assert_eq!(first.questions.len(), 3);
        assert_eq!(first.attempt.total_points, 4);
    }

    #[tokio::test]
    async fn grades_free_text_loosely_and_choices_exactly() {
        let provider = seeded_provider();
        provider.start_attempt(QuizId::new(1)).await.unwrap();

        let batch = SubmissionBatch {
            answers: vec![entry(1, "b"), entry(2, "  rust "), entry(3, "true")],
            time_spent_seconds: 42,
        };
        let scored = provider.submit_attempt(QuizId::new(1), &batch).await.unwrap();

        assert!(scored.is_submitted());
        assert_eq!(scored.correct_count, 2);
        assert_eq!(scored.points_earned, 3);
        assert_eq!(scored.time_spent_seconds, 42);
        assert!(!scored.graded(QuestionId::new(1)).unwrap().is_correct);
        assert_eq!(
            scored.graded(QuestionId::new(2)).unwrap().explanation,
            "the language"
        );
        assert!(scored.is_passed);
    }

    #[tokio::test]
    async fn submit_without_open_attempt_is_rejected() {
        let provider = seeded_provider();
        let batch = SubmissionBatch {
            answers: vec![],
            time_spent_seconds: 0,
        };
        let err = provider
            .submit_attempt(QuizId::new(1), &batch)
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Rejected { status: 400, .. }));
    }

    #[tokio::test]
    async fn injected_failure_fires_once() {
        let provider = seeded_provider();
        provider
            .fail_next_submit(ProviderError::Network("offline".into()))
            .unwrap();
        provider.start_attempt(QuizId::new(1)).await.unwrap();
        let batch = SubmissionBatch {
            answers: vec![entry(1, "B")],
            time_spent_seconds: 3,
        };

        assert!(provider.submit_attempt(QuizId::new(1), &batch).await.is_err());
        assert!(provider.submit_attempt(QuizId::new(1), &batch).await.is_ok());
        assert_eq!(provider.submissions().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn flashcards_for_unknown_quiz_are_not_found() {
        let provider = seeded_provider();
        provider
            .insert_flashcards(
                QuizId::new(1),
                vec![Flashcard::new(FlashcardId::new(1), "front", "back")],
            )
            .unwrap();
        assert_eq!(provider.flashcards(QuizId::new(1)).await.unwrap().len(), 1);
        assert_eq!(
            provider.flashcards(QuizId::new(9)).await.unwrap_err(),
            ProviderError::NotFound
        );
    }
}
