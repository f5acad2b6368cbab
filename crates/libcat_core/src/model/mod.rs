//! Catalog domain model.
//!
//! # Responsibility
//! - Define the aggregates shared by repositories, services and front-ends.
//! - Validate write-side invariants before persistence.
//!
//! # Invariants
//! - Identifier `0` marks a record that has not been persisted yet.
//! - Referential rules (book -> author, comment -> book) are enforced by the
//!   schema, not by these types.

pub mod author;
pub mod book;
pub mod comment;
pub mod genre;
pub mod student;

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Row identifier shared by all catalog entities.
pub type EntityId = i64;

/// Identifier value used for records that were never saved.
pub const UNSAVED_ID: EntityId = 0;

/// Write-side validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    BlankTitle,
    BlankCommentText,
    DuplicateGenre(EntityId),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankTitle => write!(f, "book title must not be blank"),
            Self::BlankCommentText => write!(f, "comment text must not be blank"),
            Self::DuplicateGenre(id) => write!(f, "genre {id} is listed more than once"),
        }
    }
}

impl Error for ValidationError {}

/// Names the catalog entity a lookup or write was about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Author,
    Book,
    Comment,
    Genre,
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Author => "Author",
            Self::Book => "Book",
            Self::Comment => "Comment",
            Self::Genre => "Genre",
        };
        f.write_str(name)
    }
}
