use std::fmt::Write as _;

use quiz_core::model::Attempt;
use services::{CardFace, FlashcardView, QuizSessionView, RemainingTime, SessionStatus};

/// `mm:ss`, with minutes allowed to grow past two digits.
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

pub fn render_quiz(view: &QuizSessionView) -> String {
    let mut out = String::new();
    let title = view.title.as_deref().unwrap_or("Quiz");
    let clock = match view.remaining {
        RemainingTime::Unlimited => "no time limit".to_owned(),
        RemainingTime::Seconds(s) => format!("{} left", format_clock(s)),
    };
    let _ = writeln!(
        out,
        "{title}  [{}/{}]  {} answered  {clock}",
        view.position + 1,
        view.total,
        view.progress.answered,
    );

    let marks: String = view
        .answered
        .iter()
        .enumerate()
        .map(|(i, answered)| match (i == view.position, answered) {
            (true, _) => '>',
            (false, true) => '#',
            (false, false) => '.',
        })
        .collect();
    let _ = writeln!(out, "{marks}");

    if let Some(question) = &view.current {
        let _ = writeln!(out, "\n{} ({} pt)", question.prompt, question.points);
        for choice in &question.choices {
            let picked = if *choice == question.draft { '*' } else { ' ' };
            let _ = writeln!(out, "  {picked} {choice}");
        }
        if question.choices.is_empty() && !question.draft.is_empty() {
            let _ = writeln!(out, "  your answer: {}", question.draft);
        }
    }

    match view.status {
        SessionStatus::Failed => {
            if let Some(failure) = &view.failure {
                let _ = writeln!(out, "\nerror: {}", failure.message);
            }
        }
        SessionStatus::Submitting => {
            let _ = writeln!(out, "\nsubmitting...");
        }
        _ => {}
    }
    out
}

pub fn render_result(attempt: &Attempt) -> String {
    let mut out = String::new();
    let verdict = if attempt.is_passed { "passed" } else { "not passed" };
    let _ = writeln!(
        out,
        "score {:.1}%  ({}/{} correct, {}/{} pts)  {verdict}  in {}",
        attempt.score,
        attempt.correct_count,
        attempt.total_questions,
        attempt.points_earned,
        attempt.total_points,
        format_clock(u32::try_from(attempt.time_spent_seconds).unwrap_or(u32::MAX)),
    );
    for graded in &attempt.answers {
        let mark = if graded.is_correct { '+' } else { '-' };
        let _ = writeln!(out, " {mark} {}: {}", graded.question_id, graded.answer);
        if !graded.is_correct && !graded.correct_answer.is_empty() {
            let _ = writeln!(out, "     expected: {}", graded.correct_answer);
        }
        if !graded.explanation.is_empty() {
            let _ = writeln!(out, "     {}", graded.explanation);
        }
    }
    out
}

pub fn render_card(view: &FlashcardView) -> String {
    let Some(text) = &view.text else {
        return "this quiz has no flashcards\n".to_owned();
    };
    let side = match view.face {
        CardFace::Front => "front",
        CardFace::Back => "back",
    };
    let mut out = format!(
        "card {}/{}  ({} viewed)  {side}\n\n  {text}\n",
        view.position + 1,
        view.total,
        view.viewed,
    );
    if view.face == CardFace::Front {
        if let Some(hint) = &view.hint {
            let _ = writeln!(out, "  hint: {hint}");
        }
    }
    out
}
