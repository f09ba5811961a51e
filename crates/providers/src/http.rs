//! REST client for the quiz backend.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use quiz_core::model::{Attempt, Flashcard, Question, QuizId, QuizMeta};

use crate::config::ProviderConfig;
use crate::error::ProviderError;
use crate::provider::{FlashcardProvider, QuizProvider, StartedAttempt, SubmissionBatch};

/// Quiz and flashcard provider backed by the `/quizzes` REST endpoints.
#[derive(Clone, Debug)]
pub struct HttpQuizProvider {
    client: Client,
    base_url: String,
}

impl HttpQuizProvider {
    /// # Errors
    ///
    /// Returns `ProviderError::Unavailable` if the HTTP client cannot be built.
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| ProviderError::Unavailable(err.to_string()))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
        })
    }

    fn quiz_url(&self, quiz_id: QuizId, action: &str) -> String {
        if action.is_empty() {
            format!("{}/quizzes/{quiz_id}/", self.base_url)
        } else {
            format!("{}/quizzes/{quiz_id}/{action}/", self.base_url)
        }
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ProviderError> {
    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Err(ProviderError::NotFound);
    }
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ProviderError::Rejected {
            status: status.as_u16(),
            message: error_message(&body, status),
        });
    }
    response
        .json::<T>()
        .await
        .map_err(|err| ProviderError::Decode(err.to_string()))
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    detail: Option<String>,
    message: Option<String>,
}

/// `start/` hands back the open attempt on its own when one is already in progress.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StartResponse {
    Created(StartedAttempt),
    Resumed(Attempt),
}

#[derive(Debug, Deserialize)]
struct QuizQuestions {
    #[serde(default)]
    questions: Vec<Question>,
}

fn error_message(body: &str, status: StatusCode) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.error.or(parsed.detail).or(parsed.message))
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_owned()
        })
}

#[async_trait]
impl QuizProvider for HttpQuizProvider {
    #[instrument(skip(self))]
    async fn start_attempt(&self, quiz_id: QuizId) -> Result<StartedAttempt, ProviderError> {
        let response = self
            .client
            .post(self.quiz_url(quiz_id, "start"))
            .json(&serde_json::json!({}))
            .send()
            .await?;
        let started = match decode::<StartResponse>(response).await? {
            StartResponse::Created(started) => started,
            StartResponse::Resumed(attempt) => {
                debug!(attempt_id = %attempt.id, "resuming attempt already in progress");
                let response = self.client.get(self.quiz_url(quiz_id, "")).send().await?;
                let detail: QuizQuestions = decode(response).await?;
                StartedAttempt {
                    attempt,
                    questions: detail.questions,
                }
            }
        };
        debug!(
            attempt_id = %started.attempt.id,
            questions = started.questions.len(),
            "attempt started"
        );
        Ok(started)
    }

    #[instrument(skip(self))]
    async fn quiz_meta(&self, quiz_id: QuizId) -> Result<QuizMeta, ProviderError> {
        let response = self.client.get(self.quiz_url(quiz_id, "")).send().await?;
        decode(response).await
    }

    #[instrument(skip(self, batch), fields(answers = batch.answers.len()))]
    async fn submit_attempt(
        &self,
        quiz_id: QuizId,
        batch: &SubmissionBatch,
    ) -> Result<Attempt, ProviderError> {
        let response = self
            .client
            .post(self.quiz_url(quiz_id, "submit"))
            .json(batch)
            .send()
            .await?;
        decode(response).await
    }
}

#[async_trait]
impl FlashcardProvider for HttpQuizProvider {
    #[instrument(skip(self))]
    async fn flashcards(&self, quiz_id: QuizId) -> Result<Vec<Flashcard>, ProviderError> {
        let response = self
            .client
            .get(self.quiz_url(quiz_id, "flashcards"))
            .send()
            .await?;
        decode(response).await
    }
}
