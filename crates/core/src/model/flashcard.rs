use serde::{Deserialize, Deserializer, Serialize};

use crate::model::FlashcardId;

/// A two-sided study card generated alongside a quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub id: FlashcardId,
    pub front: String,
    pub back: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub hint: Option<String>,
    #[serde(rename = "order", default)]
    pub position: u32,
}

impl Flashcard {
    #[must_use]
    pub fn new(id: FlashcardId, front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            id,
            front: front.into(),
            back: back.into(),
            hint: None,
            position: 0,
        }
    }

    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    #[must_use]
    pub fn at_position(mut self, position: u32) -> Self {
        self.position = position;
        self
    }
}

// The provider sends "" for cards without a hint.
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|hint| !hint.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_hint_decodes_as_none() {
        let json = r#"{"id": 1, "front": "Q", "back": "A", "hint": "", "order": 2}"#;
        let card: Flashcard = serde_json::from_str(json).unwrap();
        assert_eq!(card.hint, None);
        assert_eq!(card.position, 2);
    }

    #[test]
    fn present_hint_is_kept() {
        let json = r#"{"id": 1, "front": "Q", "back": "A", "hint": "think"}"#;
        let card: Flashcard = serde_json::from_str(json).unwrap();
        assert_eq!(card.hint.as_deref(), Some("think"));
    }
}
