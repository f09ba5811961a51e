use serde::Serialize;

use quiz_core::model::{Attempt, AttemptId, QuestionId, QuestionKind, QuizId};

use super::progress::QuizProgress;
use super::session::{QuizAttemptSession, SessionFailure, SessionStatus};

/// Time left on an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RemainingTime {
    Unlimited,
    Seconds(u32),
}

impl RemainingTime {
    #[must_use]
    pub fn seconds(self) -> Option<u32> {
        match self {
            Self::Unlimited => None,
            Self::Seconds(s) => Some(s),
        }
    }
}

/// The question on screen together with its current draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionView {
    pub id: QuestionId,
    pub kind: QuestionKind,
    pub prompt: String,
    pub choices: Vec<String>,
    pub points: u32,
    pub draft: String,
    pub answered: bool,
}

/// Presentation-agnostic snapshot of an attempt for the display layer.
///
/// No pre-formatted strings: the host decides how to render time, labels and scores.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuizSessionView {
    pub quiz_id: QuizId,
    pub attempt_id: Option<AttemptId>,
    pub title: Option<String>,
    pub status: SessionStatus,
    pub busy: bool,
    pub position: usize,
    pub total: usize,
    pub current: Option<QuestionView>,
    pub answered: Vec<bool>,
    pub progress: QuizProgress,
    pub remaining: RemainingTime,
    pub failure: Option<SessionFailure>,
    pub result: Option<Attempt>,
}

impl QuizSessionView {
    #[must_use]
    pub fn from_session(session: &QuizAttemptSession) -> Self {
        let current = session.current_question().map(|question| QuestionView {
            id: question.id(),
            kind: question.kind(),
            prompt: question.prompt().to_owned(),
            choices: question.choices().to_vec(),
            points: question.points(),
            draft: session.answer_for(question.id()).to_owned(),
            answered: session.is_answered(question.id()),
        });

        Self {
            quiz_id: session.quiz_id(),
            attempt_id: session.attempt_id(),
            title: session.meta().map(|meta| meta.title.clone()),
            status: session.status(),
            busy: session.is_busy(),
            position: session.position(),
            total: session.total(),
            current,
            answered: session.answered_flags(),
            progress: session.progress(),
            remaining: session
                .remaining_seconds()
                .map_or(RemainingTime::Unlimited, RemainingTime::Seconds),
            failure: session.failure().cloned(),
            result: session.result().cloned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use providers::StartedAttempt;
    use quiz_core::model::{Question, QuizMeta};
    use quiz_core::time::fixed_now;

    #[test]
    fn view_reflects_draft_and_timer() {
        let mut session = QuizAttemptSession::new(QuizId::new(2));
        session
            .begin(
                QuizMeta::new(QuizId::new(2), "Lifetimes").with_time_limit_minutes(2),
                StartedAttempt {
                    attempt: Attempt::started(AttemptId::new(8), QuizId::new(2), 2, 2, fixed_now()),
                    questions: vec![
                        Question::single_choice(QuestionId::new(1), "Pick", ["'a", "'static"]),
                        Question::open_text(QuestionId::new(2), "Why?"),
                    ],
                },
                fixed_now(),
            )
            .unwrap();
        session.answer_current("'a");
        session.tick(fixed_now());

        let view = QuizSessionView::from_session(&session);
        assert_eq!(view.title.as_deref(), Some("Lifetimes"));
        assert_eq!(view.remaining, RemainingTime::Seconds(119));
        assert_eq!(view.answered, vec![true, false]);
        let current = view.current.unwrap();
        assert_eq!(current.draft, "'a");
        assert!(current.answered);
        assert!(!view.busy);
    }

    #[test]
    fn loading_view_has_no_question() {
        let session = QuizAttemptSession::new(QuizId::new(2));
        let view = QuizSessionView::from_session(&session);
        assert!(view.busy);
        assert!(view.current.is_none());
        assert_eq!(view.remaining, RemainingTime::Unlimited);
        assert_eq!(view.remaining.seconds(), None);
    }
}
