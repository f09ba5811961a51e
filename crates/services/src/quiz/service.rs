use std::sync::Arc;
use tracing::{debug, info, warn};

use providers::{QuizProvider, SubmissionBatch};
use quiz_core::model::{Attempt, QuizId};

use crate::Clock;
use crate::error::SessionError;
use crate::ticker::TickSource;

use super::session::{QuizAttemptSession, SessionStatus, SubmitTrigger, TickOutcome};

/// What became of a submit request.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The provider scored the attempt; the session is `Completed`.
    Completed(Attempt),
    /// The session was not in a state that allows submitting, or was aborted mid-flight.
    Ignored,
}

/// Orchestrates quiz attempts against a `QuizProvider`.
///
/// Each call works on one caller-owned session; the service itself holds no session state.
#[derive(Clone)]
pub struct QuizSessionService {
    clock: Clock,
    quizzes: Arc<dyn QuizProvider>,
}

impl QuizSessionService {
    #[must_use]
    pub fn new(clock: Clock, quizzes: Arc<dyn QuizProvider>) -> Self {
        Self { clock, quizzes }
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// A fresh session in `Loading`, for hosts that render the loading state.
    #[must_use]
    pub fn open(&self, quiz_id: QuizId) -> QuizAttemptSession {
        QuizAttemptSession::new(quiz_id)
    }

    /// Start the attempt on the provider and move the session to `InProgress`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Load` if the provider fails, or `SessionError::InvalidQuiz`
    /// for inconsistent quiz data. Either way the session ends up `Failed`.
    pub async fn load(&self, session: &mut QuizAttemptSession) -> Result<(), SessionError> {
        if session.status() != SessionStatus::Loading {
            debug!(status = ?session.status(), "load ignored");
            return Ok(());
        }
        let quiz_id = session.quiz_id();

        let started = match self.quizzes.start_attempt(quiz_id).await {
            Ok(started) => started,
            Err(err) => {
                warn!(%quiz_id, error = %err, "could not start attempt");
                session.fail_load(err.message());
                return Err(SessionError::Load(err));
            }
        };
        let meta = match self.quizzes.quiz_meta(quiz_id).await {
            Ok(meta) => meta,
            Err(err) => {
                warn!(%quiz_id, error = %err, "could not fetch quiz metadata");
                session.fail_load(err.message());
                return Err(SessionError::Load(err));
            }
        };

        let attempt_id = started.attempt.id;
        let questions = started.questions.len();
        session.begin(meta, started, self.clock.now())?;
        info!(
            %quiz_id,
            %attempt_id,
            questions,
            time_limit = ?session.time_limit(),
            "attempt in progress"
        );
        Ok(())
    }

    /// Open and load in one step.
    ///
    /// # Errors
    ///
    /// Same as [`QuizSessionService::load`].
    pub async fn start(&self, quiz_id: QuizId) -> Result<QuizAttemptSession, SessionError> {
        let mut session = self.open(quiz_id);
        self.load(&mut session).await?;
        Ok(session)
    }

    /// Abandon the attempt locally. Nothing is sent to the provider.
    pub fn abort(&self, session: &mut QuizAttemptSession) -> bool {
        let status = session.status();
        if !session.abort() {
            debug!(?status, "abort ignored");
            return false;
        }
        info!(
            quiz_id = %session.quiz_id(),
            attempt_id = ?session.attempt_id(),
            ?status,
            "attempt aborted"
        );
        true
    }

    /// Submit on the user's behalf, or retry a failed submission.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Submission` if the provider rejects the batch; the session
    /// is then `Failed` with its answers intact and this call may be repeated.
    pub async fn submit(
        &self,
        session: &mut QuizAttemptSession,
    ) -> Result<SubmitOutcome, SessionError> {
        match session.request_submit(self.clock.now(), SubmitTrigger::User) {
            Some(batch) => self.dispatch(session, batch).await,
            None => Ok(SubmitOutcome::Ignored),
        }
    }

    /// Feed one clock tick. Returns the submission outcome when the tick expired the timer.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Submission` if the automatic submission fails.
    pub async fn tick(
        &self,
        session: &mut QuizAttemptSession,
    ) -> Result<Option<SubmitOutcome>, SessionError> {
        match session.tick(self.clock.now()) {
            TickOutcome::Expired(batch) => {
                info!(quiz_id = %session.quiz_id(), "time is up, submitting");
                self.dispatch(session, batch).await.map(Some)
            }
            TickOutcome::Ticked { .. } | TickOutcome::Ignored => Ok(None),
        }
    }

    /// Pull ticks from `ticks` until the session leaves `InProgress` or the source runs dry.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Submission` if the automatic submission fails.
    pub async fn run_timer(
        &self,
        session: &mut QuizAttemptSession,
        ticks: &mut dyn TickSource,
    ) -> Result<Option<SubmitOutcome>, SessionError> {
        while session.status() == SessionStatus::InProgress {
            if !ticks.next_tick().await {
                break;
            }
            if let Some(outcome) = self.tick(session).await? {
                return Ok(Some(outcome));
            }
        }
        Ok(None)
    }

    /// Send a batch obtained from `QuizAttemptSession::request_submit` and record the answer.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Submission` if the provider rejects the batch.
    pub async fn dispatch(
        &self,
        session: &mut QuizAttemptSession,
        batch: SubmissionBatch,
    ) -> Result<SubmitOutcome, SessionError> {
        let quiz_id = session.quiz_id();
        debug!(
            %quiz_id,
            answers = batch.answers.len(),
            time_spent = batch.time_spent_seconds,
            "dispatching submission"
        );
        match self.quizzes.submit_attempt(quiz_id, &batch).await {
            Ok(scored) => {
                if !session.complete(scored.clone()) {
                    return Ok(SubmitOutcome::Ignored);
                }
                info!(%quiz_id, score = scored.score, passed = scored.is_passed, "attempt completed");
                Ok(SubmitOutcome::Completed(scored))
            }
            Err(err) => {
                warn!(%quiz_id, error = %err, "submission failed");
                session.fail_submission(err.message());
                Err(SessionError::Submission(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Duration;
    use providers::{ProviderError, StartedAttempt};
    use quiz_core::model::{AttemptId, AttemptStatus, Question, QuestionId, QuizMeta};
    use quiz_core::time::{fixed_clock, fixed_now};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::ScriptedTicks;
    use crate::quiz::FailureKind;

    /// Counts calls and returns canned data; can be told to fail.
    #[derive(Default)]
    struct CountingProvider {
        starts: AtomicUsize,
        submits: AtomicUsize,
        batches: Mutex<Vec<SubmissionBatch>>,
        time_limit_minutes: i64,
        fail_start: bool,
        fail_submits: AtomicUsize,
    }

    #[async_trait]
    impl QuizProvider for CountingProvider {
        async fn start_attempt(&self, quiz_id: QuizId) -> Result<StartedAttempt, ProviderError> {
            let n = self.starts.fetch_add(1, Ordering::SeqCst) as u64;
            if self.fail_start {
                return Err(ProviderError::Rejected {
                    status: 403,
                    message: "quiz is not published".into(),
                });
            }
            Ok(StartedAttempt {
                attempt: Attempt::started(AttemptId::new(n + 1), quiz_id, 3, 3, fixed_now()),
                questions: vec![
                    Question::single_choice(QuestionId::new(1), "Q1", ["A", "B", "C"]),
                    Question::fill_in_blank(QuestionId::new(2), "Q2"),
                    Question::true_false(QuestionId::new(3), "Q3"),
                ],
            })
        }

        async fn quiz_meta(&self, quiz_id: QuizId) -> Result<QuizMeta, ProviderError> {
            Ok(QuizMeta::new(quiz_id, "Quiz").with_time_limit_minutes(self.time_limit_minutes))
        }

        async fn submit_attempt(
            &self,
            quiz_id: QuizId,
            batch: &SubmissionBatch,
        ) -> Result<Attempt, ProviderError> {
            self.submits.fetch_add(1, Ordering::SeqCst);
            self.batches.lock().unwrap().push(batch.clone());
            if self.fail_submits.load(Ordering::SeqCst) > 0 {
                self.fail_submits.fetch_sub(1, Ordering::SeqCst);
                return Err(ProviderError::Network("connection reset".into()));
            }
            let mut attempt = Attempt::started(AttemptId::new(1), quiz_id, 3, 3, fixed_now());
            attempt.status = AttemptStatus::Submitted;
            attempt.time_spent_seconds = batch.time_spent_seconds;
            attempt.score = 66.7;
            Ok(attempt)
        }
    }

    fn service_with(provider: Arc<CountingProvider>) -> QuizSessionService {
        service_after(provider, Duration::zero())
    }

    /// A service whose fixed clock reads `elapsed` past the test timestamp.
    fn service_after(provider: Arc<CountingProvider>, elapsed: Duration) -> QuizSessionService {
        let mut clock = fixed_clock();
        clock.advance(elapsed);
        QuizSessionService::new(clock, provider)
    }

    #[tokio::test]
    async fn scenario_answers_skip_and_submit() {
        let provider = Arc::new(CountingProvider {
            time_limit_minutes: 10,
            ..Default::default()
        });
        let service = service_with(Arc::clone(&provider));
        let mut session = service.start(QuizId::new(4)).await.unwrap();
        assert_eq!(session.remaining_seconds(), Some(600));

        session.answer_current("B");
        session.next();
        session.next();
        session.answer_current("true");

        let outcome = service.submit(&mut session).await.unwrap();
        assert!(matches!(outcome, SubmitOutcome::Completed(_)));
        assert_eq!(session.status(), SessionStatus::Completed);

        let batches = provider.batches.lock().unwrap();
        let sent: Vec<_> = batches[0]
            .answers
            .iter()
            .map(|e| (e.question_id.value(), e.answer.as_str()))
            .collect();
        assert_eq!(sent, vec![(1, "B"), (2, ""), (3, "true")]);
        assert_eq!(session.result().unwrap().score, 66.7);
    }

    #[tokio::test]
    async fn double_submit_reaches_provider_once() {
        let provider = Arc::new(CountingProvider::default());
        let service = service_with(Arc::clone(&provider));
        let mut session = service.start(QuizId::new(4)).await.unwrap();

        service.submit(&mut session).await.unwrap();
        let second = service.submit(&mut session).await.unwrap();

        assert_eq!(second, SubmitOutcome::Ignored);
        assert_eq!(provider.submits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn user_submit_racing_expiry_sends_one_batch() {
        let provider = Arc::new(CountingProvider {
            time_limit_minutes: 1,
            ..Default::default()
        });
        let service = service_with(Arc::clone(&provider));
        let mut session = service.start(QuizId::new(4)).await.unwrap();
        for _ in 0..59 {
            service.tick(&mut session).await.unwrap();
        }

        // User clicks submit; the batch is in flight when the final tick lands.
        let batch = session
            .request_submit(fixed_now(), SubmitTrigger::User)
            .unwrap();
        assert_eq!(service.tick(&mut session).await.unwrap(), None);
        assert_eq!(
            service.submit(&mut session).await.unwrap(),
            SubmitOutcome::Ignored
        );
        service.dispatch(&mut session, batch).await.unwrap();

        assert_eq!(provider.submits.load(Ordering::SeqCst), 1);
        assert_eq!(session.trigger(), Some(SubmitTrigger::User));
    }

    #[tokio::test]
    async fn expiry_auto_submits_on_sixtieth_tick() {
        let provider = Arc::new(CountingProvider {
            time_limit_minutes: 1,
            ..Default::default()
        });
        let service = service_with(Arc::clone(&provider));
        let mut session = service.start(QuizId::new(4)).await.unwrap();
        session.answer_current("C");

        let mut ticks = ScriptedTicks::new(500);
        let outcome = service.run_timer(&mut session, &mut ticks).await.unwrap();

        assert!(matches!(outcome, Some(SubmitOutcome::Completed(_))));
        assert_eq!(ticks.delivered(), 60);
        assert_eq!(session.trigger(), Some(SubmitTrigger::Expired));
        assert_eq!(provider.submits.load(Ordering::SeqCst), 1);
        assert_eq!(provider.batches.lock().unwrap()[0].answers[0].answer, "C");

        assert_eq!(service.tick(&mut session).await.unwrap(), None);
        assert_eq!(provider.submits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_submission_is_retried_with_same_batch() {
        let provider = Arc::new(CountingProvider {
            fail_submits: AtomicUsize::new(1),
            ..Default::default()
        });
        let mut session = service_with(Arc::clone(&provider))
            .start(QuizId::new(4))
            .await
            .unwrap();
        session.answer_current("A");

        let err = service_after(Arc::clone(&provider), Duration::seconds(40))
            .submit(&mut session)
            .await
            .unwrap_err();
        assert!(err.is_recoverable());
        assert_eq!(err.message(), "network error: connection reset");
        assert_eq!(session.failure().unwrap().kind, FailureKind::Submission);
        assert_eq!(session.answer_for(QuestionId::new(1)), "A");

        service_after(Arc::clone(&provider), Duration::seconds(80))
            .submit(&mut session)
            .await
            .unwrap();

        let batches = provider.batches.lock().unwrap();
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0], batches[1]);
        assert_eq!(batches[0].time_spent_seconds, 40);
        assert_eq!(session.status(), SessionStatus::Completed);
    }

    #[tokio::test]
    async fn load_failure_surfaces_provider_message() {
        let provider = Arc::new(CountingProvider {
            fail_start: true,
            ..Default::default()
        });
        let service = service_with(provider);
        let mut session = service.open(QuizId::new(4));

        let err = service.load(&mut session).await.unwrap_err();
        assert!(!err.is_recoverable());
        assert_eq!(session.status(), SessionStatus::Failed);
        assert_eq!(session.failure().unwrap().message, "quiz is not published");
        assert_eq!(
            service.submit(&mut session).await.unwrap(),
            SubmitOutcome::Ignored
        );
    }

    #[tokio::test]
    async fn unlimited_quiz_reports_elapsed_time() {
        let provider = Arc::new(CountingProvider::default());
        let mut session = service_with(Arc::clone(&provider))
            .start(QuizId::new(4))
            .await
            .unwrap();
        assert_eq!(session.remaining_seconds(), None);

        service_after(Arc::clone(&provider), Duration::minutes(42))
            .submit(&mut session)
            .await
            .unwrap();

        assert_eq!(session.result().unwrap().time_spent_seconds, 42 * 60);
    }

    #[tokio::test]
    async fn abort_stops_the_attempt_once() {
        let provider = Arc::new(CountingProvider {
            time_limit_minutes: 1,
            ..Default::default()
        });
        let service = service_with(Arc::clone(&provider));
        let mut session = service.start(QuizId::new(4)).await.unwrap();

        assert!(service.abort(&mut session));
        assert_eq!(session.status(), SessionStatus::Aborted);
        assert!(!service.abort(&mut session));

        let mut ticks = ScriptedTicks::new(120);
        assert_eq!(service.run_timer(&mut session, &mut ticks).await.unwrap(), None);
        assert_eq!(provider.submits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn loading_twice_does_not_start_a_second_attempt() {
        let provider = Arc::new(CountingProvider::default());
        let service = service_with(Arc::clone(&provider));
        let mut session = service.start(QuizId::new(4)).await.unwrap();
        service.load(&mut session).await.unwrap();
        assert_eq!(provider.starts.load(Ordering::SeqCst), 1);
    }
}
