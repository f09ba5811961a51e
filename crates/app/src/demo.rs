use providers::{InMemoryProvider, ProviderError, SeededQuestion};
use quiz_core::model::{Flashcard, FlashcardId, Question, QuestionId, QuizId, QuizMeta};

/// Id of the quiz seeded by [`demo_provider`].
pub const DEMO_QUIZ: QuizId = QuizId::new(1);

/// An offline backend with one short timed quiz and its flashcards.
pub fn demo_provider() -> Result<InMemoryProvider, ProviderError> {
    let provider = InMemoryProvider::new();
    provider.insert_quiz(
        QuizMeta::new(DEMO_QUIZ, "Ownership and borrowing").with_time_limit_minutes(5),
        vec![
            SeededQuestion::new(
                Question::single_choice(
                    QuestionId::new(1),
                    "Which of these owns its heap allocation?",
                    ["&str", "String", "&[u8]"],
                ),
                "String",
            )
            .with_explanation("String is an owned, growable UTF-8 buffer."),
            SeededQuestion::new(
                Question::true_false(
                    QuestionId::new(2),
                    "Any number of `&mut T` borrows may coexist.",
                ),
                "false",
            )
            .with_explanation("Only one mutable borrow may be live at a time."),
            SeededQuestion::new(
                Question::fill_in_blank(
                    QuestionId::new(3),
                    "Assigning a String to another variable ___ it.",
                ),
                "moves",
            )
            .with_explanation("Non-Copy values are moved on assignment."),
            SeededQuestion::new(
                Question::open_text(QuestionId::new(4), "Name the trait that runs cleanup code.")
                    .with_points(2),
                "Drop",
            ),
        ],
    )?;
    provider.insert_flashcards(
        DEMO_QUIZ,
        vec![
            Flashcard::new(FlashcardId::new(1), "Move", "Ownership transfers to the new binding")
                .at_position(1),
            Flashcard::new(FlashcardId::new(2), "Borrow", "A reference that does not take ownership")
                .with_hint("&T or &mut T")
                .at_position(2),
            Flashcard::new(FlashcardId::new(3), "Lifetime", "The region where a reference is valid")
                .at_position(3),
            Flashcard::new(FlashcardId::new(4), "Copy", "Types duplicated bit-for-bit on assignment")
                .with_hint("i32, bool, char")
                .at_position(4),
            Flashcard::new(FlashcardId::new(5), "Drop", "Runs when a value goes out of scope")
                .at_position(5),
        ],
    )?;
    Ok(provider)
}
