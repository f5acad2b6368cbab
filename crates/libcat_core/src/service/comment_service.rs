//! Comment use-case service.
//!
//! # Invariants
//! - New comments attach only to existing books.
//! - Updates change the text only; the owning book never moves.

use crate::model::comment::Comment;
use crate::model::{EntityId, EntityKind};
use crate::repo::book_repo::{BookFetch, BookRepository};
use crate::repo::comment_repo::CommentRepository;
use crate::service::{ServiceError, ServiceResult};
use log::info;

/// Comment service facade over repository implementations.
pub struct CommentService<C: CommentRepository, B: BookRepository> {
    comments: C,
    books: B,
}

impl<C: CommentRepository, B: BookRepository> CommentService<C, B> {
    pub fn new(comments: C, books: B) -> Self {
        Self { comments, books }
    }

    pub fn find_by_id(&self, id: EntityId) -> ServiceResult<Option<Comment>> {
        Ok(self.comments.find_by_id(id)?)
    }

    pub fn find_all_by_book_id(&self, book_id: EntityId) -> ServiceResult<Vec<Comment>> {
        Ok(self.comments.find_by_book_id(book_id)?)
    }

    pub fn insert(&self, text: &str, book_id: EntityId) -> ServiceResult<Comment> {
        if self.books.find_by_id(book_id, BookFetch::Summary)?.is_none() {
            return Err(ServiceError::not_found(EntityKind::Book, book_id));
        }

        let saved = self.comments.save(&Comment::unsaved(text, book_id))?;
        info!(
            "event=comment_insert module=service status=ok id={} book_id={book_id}",
            saved.id
        );
        Ok(saved)
    }

    pub fn update(&self, id: EntityId, text: &str) -> ServiceResult<Comment> {
        let mut comment = self
            .comments
            .find_by_id(id)?
            .ok_or_else(|| ServiceError::not_found(EntityKind::Comment, id))?;
        comment.text = text.to_string();
        Ok(self.comments.save(&comment)?)
    }

    pub fn delete_by_id(&self, id: EntityId) -> ServiceResult<()> {
        self.comments.delete_by_id(id)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::CommentService;
    use crate::repo::memory::{MemoryBookRepository, MemoryCommentRepository, MemoryStore};
    use crate::service::ServiceError;

    fn service(
        store: &MemoryStore,
    ) -> CommentService<MemoryCommentRepository<'_>, MemoryBookRepository<'_>> {
        CommentService::new(
            MemoryCommentRepository::new(store),
            MemoryBookRepository::new(store),
        )
    }

    #[test]
    fn insert_for_missing_book_is_not_found() {
        let store = MemoryStore::with_demo_data();
        let err = service(&store).insert("hello", 9).unwrap_err();

        assert!(matches!(err, ServiceError::NotFound(ref message) if message == "Book with id 9 not found"));
    }

    #[test]
    fn update_changes_text_only() {
        let store = MemoryStore::with_demo_data();
        let service = service(&store);

        let updated = service.update(3, "edited").unwrap();

        assert_eq!(updated.text, "edited");
        assert_eq!(updated.book_id, 2);
        assert_eq!(service.find_by_id(3).unwrap().unwrap().text, "edited");
    }

    #[test]
    fn update_missing_comment_is_not_found() {
        let store = MemoryStore::with_demo_data();
        let err = service(&store).update(100, "edited").unwrap_err();

        assert_eq!(err.to_string(), "Comment with id 100 not found");
    }

    #[test]
    fn blank_text_is_rejected() {
        let store = MemoryStore::with_demo_data();
        let err = service(&store).insert("  ", 1).unwrap_err();

        assert!(matches!(err, ServiceError::Validation(_)));
    }
}
