/// A line typed during a quiz attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizCommand {
    Next,
    Previous,
    /// One-based question number, as shown on screen.
    GoTo(usize),
    Answer(String),
    Submit,
    Show,
    Quit,
    Help,
}

/// A line typed during flashcard review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardCommand {
    Flip,
    Next,
    Previous,
    GoTo(usize),
    Shuffle,
    Reset,
    Quit,
    Help,
}

pub const QUIZ_HELP: &str = "commands: n(ext) p(rev) g <n> a <answer> s(ubmit) v(iew) q(uit)";
pub const CARD_HELP: &str = "commands: f(lip) n(ext) p(rev) g <n> s(huffle) r(eset) q(uit)";

/// Parse a quiz command. An empty line redraws the screen.
pub fn parse_quiz(line: &str) -> Result<QuizCommand, String> {
    let line = line.trim();
    let (word, rest) = split_word(line);
    match word {
        "" | "v" | "view" => Ok(QuizCommand::Show),
        "n" | "next" => Ok(QuizCommand::Next),
        "p" | "prev" => Ok(QuizCommand::Previous),
        "g" | "goto" => parse_position(rest).map(QuizCommand::GoTo),
        // The answer keeps inner whitespace; only the separator is dropped.
        "a" | "answer" => Ok(QuizCommand::Answer(rest.to_owned())),
        "s" | "submit" => Ok(QuizCommand::Submit),
        "q" | "quit" => Ok(QuizCommand::Quit),
        "h" | "help" | "?" => Ok(QuizCommand::Help),
        other => Err(format!("unknown command `{other}`")),
    }
}

pub fn parse_card(line: &str) -> Result<CardCommand, String> {
    let (word, rest) = split_word(line.trim());
    match word {
        "" | "f" | "flip" => Ok(CardCommand::Flip),
        "n" | "next" => Ok(CardCommand::Next),
        "p" | "prev" => Ok(CardCommand::Previous),
        "g" | "goto" => parse_position(rest).map(CardCommand::GoTo),
        "s" | "shuffle" => Ok(CardCommand::Shuffle),
        "r" | "reset" => Ok(CardCommand::Reset),
        "q" | "quit" => Ok(CardCommand::Quit),
        "h" | "help" | "?" => Ok(CardCommand::Help),
        other => Err(format!("unknown command `{other}`")),
    }
}

fn split_word(line: &str) -> (&str, &str) {
    match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim_start()),
        None => (line, ""),
    }
}

fn parse_position(raw: &str) -> Result<usize, String> {
    match raw.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!("expected a number from 1, got `{}`", raw.trim())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answer_keeps_its_text() {
        assert_eq!(
            parse_quiz("a  borrow checker"),
            Ok(QuizCommand::Answer("borrow checker".into()))
        );
        assert_eq!(parse_quiz("a"), Ok(QuizCommand::Answer(String::new())));
    }

    #[test]
    fn goto_is_one_based() {
        assert_eq!(parse_quiz("g 3"), Ok(QuizCommand::GoTo(3)));
        assert!(parse_quiz("g 0").is_err());
        assert!(parse_card("g x").is_err());
    }

    #[test]
    fn empty_line_defaults() {
        assert_eq!(parse_quiz("  "), Ok(QuizCommand::Show));
        assert_eq!(parse_card(""), Ok(CardCommand::Flip));
    }

    #[test]
    fn unknown_words_are_rejected() {
        assert_eq!(parse_card("jump"), Err("unknown command `jump`".into()));
    }
}
