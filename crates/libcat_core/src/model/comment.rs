//! Reader comment attached to exactly one book.

use super::{EntityId, ValidationError, UNSAVED_ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: EntityId,
    pub text: String,
    /// Owning book. Must reference an existing row when persisted.
    pub book_id: EntityId,
}

impl Comment {
    pub fn new(id: EntityId, text: impl Into<String>, book_id: EntityId) -> Self {
        Self {
            id,
            text: text.into(),
            book_id,
        }
    }

    /// Creates a comment that has not been saved yet.
    pub fn unsaved(text: impl Into<String>, book_id: EntityId) -> Self {
        Self::new(UNSAVED_ID, text, book_id)
    }

    pub fn is_new(&self) -> bool {
        self.id == UNSAVED_ID
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.text.trim().is_empty() {
            return Err(ValidationError::BlankCommentText);
        }
        Ok(())
    }
}
