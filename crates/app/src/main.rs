//! Terminal host for quiz attempts and flashcard review.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use providers::{FlashcardProvider, HttpQuizProvider, ProviderConfig, QuizProvider};
use quiz_core::model::QuizId;
use services::{Clock, FlashcardService, QuizSessionService};

mod commands;
mod demo;
mod host;
mod render;

#[derive(Parser)]
#[command(name = "quiz-session", version, about = "Take quizzes and review flashcards")]
struct Cli {
    /// Base URL of the quiz API (e.g. https://example.org/api)
    #[arg(long, env = "QUIZ_API_URL", global = true)]
    api_url: Option<String>,

    /// Request timeout for the quiz API, in seconds
    #[arg(long, env = "QUIZ_API_TIMEOUT_SECS", default_value = "30", global = true)]
    timeout_secs: u64,

    /// Use the built-in offline quiz instead of the API
    #[arg(long, global = true)]
    demo: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Take a timed quiz attempt
    Quiz {
        /// Quiz to attempt
        #[arg(long, env = "QUIZ_ID")]
        quiz_id: Option<QuizId>,
    },

    /// Review the flashcards generated for a quiz
    Flashcards {
        /// Quiz whose flashcards to review
        #[arg(long, env = "QUIZ_ID")]
        quiz_id: Option<QuizId>,
    },
}

struct Backend {
    quizzes: Arc<dyn QuizProvider>,
    cards: Arc<dyn FlashcardProvider>,
    /// Quiz to open when none is given on the command line.
    default_quiz: Option<QuizId>,
}

fn backend(cli: &Cli) -> Result<Backend> {
    match (&cli.api_url, cli.demo) {
        (Some(url), false) => {
            let config =
                ProviderConfig::new(url.as_str()).with_timeout(Duration::from_secs(cli.timeout_secs));
            let http = Arc::new(
                HttpQuizProvider::new(&config).context("failed to build the HTTP client")?,
            );
            info!(base_url = %config.base_url, "using quiz API");
            Ok(Backend {
                quizzes: Arc::clone(&http) as Arc<dyn QuizProvider>,
                cards: http,
                default_quiz: None,
            })
        }
        _ => {
            let provider = Arc::new(demo::demo_provider().context("failed to seed the demo quiz")?);
            info!("using the offline demo quiz");
            Ok(Backend {
                quizzes: Arc::clone(&provider) as Arc<dyn QuizProvider>,
                cards: provider,
                default_quiz: Some(demo::DEMO_QUIZ),
            })
        }
    }
}

fn pick_quiz(requested: Option<QuizId>, backend: &Backend) -> Result<QuizId> {
    requested
        .or(backend.default_quiz)
        .context("no quiz selected; pass --quiz-id or set QUIZ_ID")
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let backend = backend(&cli)?;

    match cli.command {
        Commands::Quiz { quiz_id } => {
            let quiz_id = pick_quiz(quiz_id, &backend)?;
            let service = QuizSessionService::new(Clock::system(), backend.quizzes);
            host::run_quiz(&service, quiz_id).await
        }
        Commands::Flashcards { quiz_id } => {
            let quiz_id = pick_quiz(quiz_id, &backend)?;
            let service = FlashcardService::new(backend.cards);
            host::run_flashcards(&service, quiz_id).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_is_used_without_an_api_url() {
        let cli = Cli::try_parse_from(["quiz-session", "quiz"]).unwrap();
        let backend = backend(&cli).unwrap();
        assert_eq!(pick_quiz(None, &backend).unwrap(), demo::DEMO_QUIZ);
    }

    #[test]
    fn api_mode_needs_a_quiz_id() {
        let cli = Cli::try_parse_from([
            "quiz-session",
            "--api-url",
            "http://localhost:8000/api",
            "flashcards",
        ])
        .unwrap();
        let backend = backend(&cli).unwrap();
        assert!(pick_quiz(None, &backend).is_err());
        assert_eq!(pick_quiz(Some(QuizId::new(9)), &backend).unwrap(), QuizId::new(9));
    }

    #[test]
    fn quiz_id_parses_from_flag() {
        let cli = Cli::try_parse_from(["quiz-session", "quiz", "--quiz-id", "42"]).unwrap();
        let Commands::Quiz { quiz_id } = cli.command else {
            panic!("expected the quiz subcommand");
        };
        assert_eq!(quiz_id, Some(QuizId::new(42)));
    }
}
