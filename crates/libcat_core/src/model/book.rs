//! Book aggregate.
//!
//! # Invariants
//! - Every book has exactly one author.
//! - `genres` holds distinct genres in ascending id order once loaded.
//! - `comments` is empty unless the fetch plan asked for them.

use super::author::Author;
use super::comment::Comment;
use super::genre::Genre;
use super::{EntityId, ValidationError, UNSAVED_ID};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: EntityId,
    pub title: String,
    pub author: Author,
    pub genres: Vec<Genre>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<Comment>,
}

impl Book {
    /// Creates a book without comments.
    pub fn new(id: EntityId, title: impl Into<String>, author: Author, genres: Vec<Genre>) -> Self {
        Self {
            id,
            title: title.into(),
            author,
            genres,
            comments: Vec::new(),
        }
    }

    /// Creates a book that has not been saved yet.
    pub fn unsaved(title: impl Into<String>, author: Author, genres: Vec<Genre>) -> Self {
        Self::new(UNSAVED_ID, title, author, genres)
    }

    pub fn with_comments(mut self, comments: Vec<Comment>) -> Self {
        self.comments = comments;
        self
    }

    pub fn is_new(&self) -> bool {
        self.id == UNSAVED_ID
    }

    pub fn genre_ids(&self) -> Vec<EntityId> {
        self.genres.iter().map(|genre| genre.id).collect()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::BlankTitle);
        }
        let mut seen = HashSet::with_capacity(self.genres.len());
        for genre in &self.genres {
            if !seen.insert(genre.id) {
                return Err(ValidationError::DuplicateGenre(genre.id));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Book;
    use crate::model::author::Author;
    use crate::model::comment::Comment;
    use crate::model::genre::Genre;
    use crate::model::ValidationError;

    fn author() -> Author {
        Author::new(1, "Author_1")
    }

    #[test]
    fn blank_title_is_rejected() {
        let book = Book::unsaved("   ", author(), vec![]);
        assert_eq!(book.validate(), Err(ValidationError::BlankTitle));
    }

    #[test]
    fn duplicate_genres_are_rejected() {
        let genre = Genre::new(2, "Genre_2");
        let book = Book::unsaved("Title", author(), vec![genre.clone(), genre]);
        assert_eq!(book.validate(), Err(ValidationError::DuplicateGenre(2)));
    }

    #[test]
    fn unsaved_book_is_new() {
        let book = Book::unsaved("Title", author(), vec![Genre::new(1, "Genre_1")]);
        assert!(book.is_new());
        assert_eq!(book.genre_ids(), vec![1]);
        assert!(book.validate().is_ok());
    }

    #[test]
    fn json_omits_comments_until_loaded() {
        let book = Book::new(3, "Title", author(), vec![Genre::new(5, "Genre_5")]);
        let json = serde_json::to_value(&book).unwrap();
        assert!(json.get("comments").is_none());
        assert_eq!(json["author"]["full_name"], "Author_1");

        let restored: Book = serde_json::from_value(json).unwrap();
        assert_eq!(restored, book);

        let with_comments = book.with_comments(vec![Comment::new(9, "Nice", 3)]);
        let json = serde_json::to_value(&with_comments).unwrap();
        assert_eq!(json["comments"][0]["text"], "Nice");
    }
}
