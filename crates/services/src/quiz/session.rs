use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use tracing::debug;

use providers::{StartedAttempt, SubmissionBatch};
use quiz_core::model::{
    Attempt, AttemptId, Question, QuestionId, QuizId, QuizMeta, TimeLimit, validate_questions,
};
use quiz_core::time::seconds_between;
use quiz_core::{AnswerStore, Countdown, Cursor, QuizDataError, TimerEvent};

use super::progress::QuizProgress;

//
// ─── STATUS ────────────────────────────────────────────────────────────────────
//

/// Where an attempt is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionStatus {
    Loading,
    InProgress,
    Submitting,
    Completed,
    Failed,
    Aborted,
}

impl SessionStatus {
    /// The host should disable mutating input while busy.
    #[must_use]
    pub fn is_busy(self) -> bool {
        matches!(self, Self::Loading | Self::Submitting)
    }

    #[must_use]
    pub fn is_finished(self) -> bool {
        matches!(self, Self::Completed | Self::Aborted)
    }
}

/// What moved the attempt into `Submitting`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SubmitTrigger {
    User,
    /// The countdown ran out.
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FailureKind {
    /// Terminal: the attempt could not be started.
    Load,
    /// Recoverable: answers are kept and `submit` may be retried.
    Submission,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionFailure {
    pub kind: FailureKind,
    pub message: String,
}

/// Result of feeding one clock tick to a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not in progress, or no time limit.
    Ignored,
    Ticked { remaining: u32 },
    /// Time ran out; the session is now `Submitting` and this batch must be sent.
    Expired(SubmissionBatch),
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory state of one quiz attempt.
///
/// Owns its countdown, cursor and answer store. Every mutating command is accepted only
/// in the state that allows it and is otherwise a silent no-op reported through the
/// return value. The session performs no I/O; `QuizSessionService` talks to the provider.
pub struct QuizAttemptSession {
    quiz_id: QuizId,
    meta: Option<QuizMeta>,
    attempt: Option<Attempt>,
    questions: Vec<Question>,
    cursor: Cursor,
    answers: AnswerStore,
    timer: Countdown,
    time_limit: TimeLimit,
    status: SessionStatus,
    started_at: Option<DateTime<Utc>>,
    batch: Option<SubmissionBatch>,
    trigger: Option<SubmitTrigger>,
    result: Option<Attempt>,
    failure: Option<SessionFailure>,
}

impl QuizAttemptSession {
    /// A session waiting for its attempt to be loaded.
    #[must_use]
    pub fn new(quiz_id: QuizId) -> Self {
        Self {
            quiz_id,
            meta: None,
            attempt: None,
            questions: Vec::new(),
            cursor: Cursor::new(0),
            answers: AnswerStore::default(),
            timer: Countdown::new(),
            time_limit: TimeLimit::Unlimited,
            status: SessionStatus::Loading,
            started_at: None,
            batch: None,
            trigger: None,
            result: None,
            failure: None,
        }
    }

    /// Move from `Loading` to `InProgress` with the provider's attempt and questions.
    ///
    /// `now` is the session start used for time-spent accounting.
    ///
    /// # Errors
    ///
    /// Returns `QuizDataError` and moves to `Failed` if the quiz data is inconsistent.
    pub fn begin(
        &mut self,
        meta: QuizMeta,
        started: StartedAttempt,
        now: DateTime<Utc>,
    ) -> Result<(), QuizDataError> {
        if self.status != SessionStatus::Loading {
            debug!(status = ?self.status, "begin ignored");
            return Ok(());
        }
        if let Err(err) = meta.validate().and(validate_questions(&started.questions)) {
            self.fail_load(err.to_string());
            return Err(err);
        }

        self.time_limit = meta.time_limit();
        self.cursor = Cursor::new(started.questions.len());
        self.answers = AnswerStore::for_questions(&started.questions);
        self.questions = started.questions;
        self.attempt = Some(started.attempt);
        self.meta = Some(meta);
        self.started_at = Some(now);
        self.timer.start(self.time_limit.as_seconds());
        self.status = SessionStatus::InProgress;
        Ok(())
    }

    /// Record a load failure. Only valid while `Loading`.
    pub fn fail_load(&mut self, message: impl Into<String>) -> bool {
        if self.status != SessionStatus::Loading {
            return false;
        }
        self.failure = Some(SessionFailure {
            kind: FailureKind::Load,
            message: message.into(),
        });
        self.status = SessionStatus::Failed;
        true
    }

    fn accepts_input(&self, command: &'static str) -> bool {
        if self.status == SessionStatus::InProgress {
            return true;
        }
        debug!(command, status = ?self.status, "command ignored");
        false
    }

    //
    // ─── COMMANDS ──────────────────────────────────────────────────────────────
    //

    /// Upsert the draft answer for a question of this quiz.
    pub fn answer(&mut self, question_id: QuestionId, text: impl Into<String>) -> bool {
        self.accepts_input("answer") && self.answers.set_answer(question_id, text)
    }

    /// Upsert the draft answer for the question currently shown.
    pub fn answer_current(&mut self, text: impl Into<String>) -> bool {
        match self.current_question().map(Question::id) {
            Some(id) => self.answer(id, text),
            None => false,
        }
    }

    pub fn next(&mut self) -> bool {
        self.accepts_input("next") && self.cursor.next()
    }

    pub fn previous(&mut self) -> bool {
        self.accepts_input("previous") && self.cursor.previous()
    }

    pub fn go_to(&mut self, index: usize) -> bool {
        self.accepts_input("go_to") && self.cursor.go_to(index)
    }

    /// Feed one second of the host's clock. On expiry the session submits itself.
    pub fn tick(&mut self, now: DateTime<Utc>) -> TickOutcome {
        if self.status != SessionStatus::InProgress {
            return TickOutcome::Ignored;
        }
        match self.timer.tick() {
            None => TickOutcome::Ignored,
            Some(TimerEvent::Tick { remaining }) => TickOutcome::Ticked { remaining },
            Some(TimerEvent::Expired) => self
                .request_submit(now, SubmitTrigger::Expired)
                .map_or(TickOutcome::Ignored, TickOutcome::Expired),
        }
    }

    /// Enter `Submitting` and hand out the batch to send.
    ///
    /// From `InProgress` the batch is the answer store as of this instant plus the
    /// elapsed time since start. From a failed submission the identical batch is handed
    /// out again. In every other state, including `Submitting`, this returns `None`,
    /// so only the first of several racing triggers goes through.
    pub fn request_submit(
        &mut self,
        now: DateTime<Utc>,
        trigger: SubmitTrigger,
    ) -> Option<SubmissionBatch> {
        match self.status {
            SessionStatus::InProgress => {
                self.timer.cancel();
                let time_spent_seconds = self
                    .started_at
                    .map_or(0, |started| seconds_between(started, now));
                let batch = SubmissionBatch {
                    answers: self.answers.snapshot(),
                    time_spent_seconds,
                };
                self.batch = Some(batch.clone());
                self.trigger = Some(trigger);
                self.status = SessionStatus::Submitting;
                Some(batch)
            }
            SessionStatus::Failed
                if self
                    .failure
                    .as_ref()
                    .is_some_and(|f| f.kind == FailureKind::Submission) =>
            {
                let batch = self.batch.clone()?;
                self.failure = None;
                self.status = SessionStatus::Submitting;
                Some(batch)
            }
            _ => {
                debug!(?trigger, status = ?self.status, "submit ignored");
                None
            }
        }
    }

    /// Store the provider's scored attempt. Only valid while `Submitting`.
    pub fn complete(&mut self, scored: Attempt) -> bool {
        if self.status != SessionStatus::Submitting {
            debug!(status = ?self.status, "late result dropped");
            return false;
        }
        self.result = Some(scored);
        self.status = SessionStatus::Completed;
        true
    }

    /// Record a failed submission. The answers and the batch are kept for a retry.
    pub fn fail_submission(&mut self, message: impl Into<String>) -> bool {
        if self.status != SessionStatus::Submitting {
            return false;
        }
        self.failure = Some(SessionFailure {
            kind: FailureKind::Submission,
            message: message.into(),
        });
        self.status = SessionStatus::Failed;
        true
    }

    /// Abandon the attempt without submitting. Stops the countdown for good.
    pub fn abort(&mut self) -> bool {
        if self.status.is_finished() {
            return false;
        }
        self.timer.cancel();
        self.status = SessionStatus::Aborted;
        true
    }

    //
    // ─── QUERIES ───────────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn quiz_id(&self) -> QuizId {
        self.quiz_id
    }

    #[must_use]
    pub fn attempt_id(&self) -> Option<AttemptId> {
        self.attempt.as_ref().map(|a| a.id)
    }

    #[must_use]
    pub fn meta(&self) -> Option<&QuizMeta> {
        self.meta.as_ref()
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.status.is_busy()
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    /// Zero-based index of the question being shown.
    #[must_use]
    pub fn position(&self) -> usize {
        self.cursor.current()
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.cursor.current())
    }

    #[must_use]
    pub fn answer_for(&self, question_id: QuestionId) -> &str {
        self.answers.answer(question_id)
    }

    #[must_use]
    pub fn is_answered(&self, question_id: QuestionId) -> bool {
        self.answers.is_answered(question_id)
    }

    /// Answered flag per question, in question order.
    #[must_use]
    pub fn answered_flags(&self) -> Vec<bool> {
        self.questions
            .iter()
            .map(|q| self.answers.is_answered(q.id()))
            .collect()
    }

    #[must_use]
    pub fn progress(&self) -> QuizProgress {
        let answered = self.answers.answered_count();
        QuizProgress {
            total: self.total(),
            answered,
            unanswered: self.total().saturating_sub(answered),
            position: self.cursor.current(),
            percent: self.cursor.progress_percent(),
        }
    }

    #[must_use]
    pub fn time_limit(&self) -> TimeLimit {
        self.time_limit
    }

    /// Seconds left on the countdown, `None` when the quiz has no time limit.
    #[must_use]
    pub fn remaining_seconds(&self) -> Option<u32> {
        self.timer.remaining()
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// The batch handed to the provider, once submission has started.
    #[must_use]
    pub fn submitted_batch(&self) -> Option<&SubmissionBatch> {
        self.batch.as_ref()
    }

    #[must_use]
    pub fn trigger(&self) -> Option<SubmitTrigger> {
        self.trigger
    }

    #[must_use]
    pub fn result(&self) -> Option<&Attempt> {
        self.result.as_ref()
    }

    #[must_use]
    pub fn failure(&self) -> Option<&SessionFailure> {
        self.failure.as_ref()
    }
}

impl fmt::Debug for QuizAttemptSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizAttemptSession")
            .field("quiz_id", &self.quiz_id)
            .field("attempt_id", &self.attempt_id())
            .field("status", &self.status)
            .field("questions_len", &self.questions.len())
            .field("position", &self.cursor.current())
            .field("remaining", &self.timer.remaining())
            .field("trigger", &self.trigger)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
