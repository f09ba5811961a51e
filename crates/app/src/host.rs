use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{debug, info};

use quiz_core::model::QuizId;
use services::{
    FlashcardService, FlashcardView, IntervalTicker, QuizSessionService, QuizSessionView,
    SessionStatus, SubmitOutcome, TickSource,
};

use crate::commands::{CARD_HELP, CardCommand, QUIZ_HELP, QuizCommand, parse_card, parse_quiz};
use crate::render::{format_clock, render_card, render_quiz, render_result};

type Input = Lines<BufReader<Stdin>>;

fn stdin_lines() -> Input {
    BufReader::new(tokio::io::stdin()).lines()
}

/// Drive one attempt from stdin while a one-second interval feeds the countdown.
pub async fn run_quiz(service: &QuizSessionService, quiz_id: QuizId) -> Result<()> {
    let mut session = service.open(quiz_id);
    println!("loading quiz {quiz_id}...");
    if let Err(err) = service.load(&mut session).await {
        println!("could not load the quiz: {}", err.message());
        return Ok(());
    }
    println!("{QUIZ_HELP}\n");
    print!("{}", render_quiz(&QuizSessionView::from_session(&session)));

    let mut input = stdin_lines();
    let mut ticker = IntervalTicker::every_second();
    let timed = session.remaining_seconds().is_some();

    while !session.status().is_finished() {
        tokio::select! {
            line = input.next_line() => {
                let Some(line) = line? else {
                    service.abort(&mut session);
                    break;
                };
                let command = match parse_quiz(&line) {
                    Ok(command) => command,
                    Err(message) => {
                        println!("{message}");
                        continue;
                    }
                };
                match command {
                    QuizCommand::Next => { session.next(); }
                    QuizCommand::Previous => { session.previous(); }
                    QuizCommand::GoTo(n) => {
                        if !session.go_to(n - 1) {
                            println!("there is no question {n}");
                            continue;
                        }
                    }
                    QuizCommand::Answer(text) => { session.answer_current(text); }
                    QuizCommand::Submit => {
                        println!("submitting...");
                        match service.submit(&mut session).await {
                            Ok(SubmitOutcome::Completed(attempt)) => {
                                print!("{}", render_result(&attempt));
                                break;
                            }
                            Ok(SubmitOutcome::Ignored) => debug!("submit ignored"),
                            Err(err) => {
                                println!("submission failed: {}; type `s` to retry", err.message());
                                continue;
                            }
                        }
                    }
                    QuizCommand::Show => {}
                    QuizCommand::Help => {
                        println!("{QUIZ_HELP}");
                        continue;
                    }
                    QuizCommand::Quit => {
                        service.abort(&mut session);
                        break;
                    }
                }
                print!("{}", render_quiz(&QuizSessionView::from_session(&session)));
            }
            _ = ticker.next_tick(), if timed && session.status() == SessionStatus::InProgress => {
                match service.tick(&mut session).await {
                    Ok(Some(SubmitOutcome::Completed(attempt))) => {
                        println!("\ntime is up");
                        print!("{}", render_result(&attempt));
                        break;
                    }
                    Ok(_) => announce_remaining(session.remaining_seconds()),
                    Err(err) => {
                        println!(
                            "\ntime is up, but the submission failed: {}; type `s` to retry",
                            err.message()
                        );
                    }
                }
            }
        }
    }
    Ok(())
}

fn announce_remaining(remaining: Option<u32>) {
    if let Some(s @ (60 | 30 | 10)) = remaining {
        println!("{} left", format_clock(s));
    }
}

/// Review a quiz's flashcards from stdin. Nothing is submitted.
pub async fn run_flashcards(service: &FlashcardService, quiz_id: QuizId) -> Result<()> {
    let mut review = match service.start(quiz_id).await {
        Ok(review) => review,
        Err(err) => {
            println!("could not load flashcards: {}", err.message());
            return Ok(());
        }
    };
    println!("{CARD_HELP}\n");
    print!("{}", render_card(&FlashcardView::from_session(&review)));

    let mut input = stdin_lines();
    while let Some(line) = input.next_line().await? {
        let command = match parse_card(&line) {
            Ok(command) => command,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };
        match command {
            CardCommand::Flip => {
                review.flip();
            }
            CardCommand::Next => {
                review.next();
            }
            CardCommand::Previous => {
                review.previous();
            }
            CardCommand::GoTo(n) => {
                if !review.go_to(n - 1) {
                    println!("there is no card {n}");
                    continue;
                }
            }
            CardCommand::Shuffle => review.shuffle(),
            CardCommand::Reset => review.reset(),
            CardCommand::Help => {
                println!("{CARD_HELP}");
                continue;
            }
            CardCommand::Quit => break,
        }
        print!("{}", render_card(&FlashcardView::from_session(&review)));
    }
    info!(%quiz_id, viewed = review.viewed_count(), total = review.total(), "review finished");
    Ok(())
}
