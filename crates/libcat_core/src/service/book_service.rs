//! Book use-case service.
//!
//! # Responsibility
//! - Resolve author and genre references before a book write.
//! - Pick the fetch plan per use-case.
//!
//! # Invariants
//! - A book is never written with an unknown author or genre.
//! - A book is never written without genres.

use crate::model::author::Author;
use crate::model::book::Book;
use crate::model::genre::Genre;
use crate::model::{EntityId, EntityKind};
use crate::repo::author_repo::AuthorRepository;
use crate::repo::book_repo::{BookFetch, BookRepository};
use crate::repo::genre_repo::GenreRepository;
use crate::service::{ServiceError, ServiceResult};
use log::info;
use std::collections::BTreeSet;

/// Book service facade over repository implementations.
pub struct BookService<B, A, G>
where
    B: BookRepository,
    A: AuthorRepository,
    G: GenreRepository,
{
    books: B,
    authors: A,
    genres: G,
}

impl<B, A, G> BookService<B, A, G>
where
    B: BookRepository,
    A: AuthorRepository,
    G: GenreRepository,
{
    pub fn new(books: B, authors: A, genres: G) -> Self {
        Self {
            books,
            authors,
            genres,
        }
    }

    /// Loads one book with author, genres and comments.
    pub fn find_by_id(&self, id: EntityId) -> ServiceResult<Option<Book>> {
        Ok(self.books.find_by_id(id, BookFetch::Full)?)
    }

    /// Lists all books with author and genres. Comments are not loaded.
    pub fn find_all(&self) -> ServiceResult<Vec<Book>> {
        Ok(self.books.find_all(BookFetch::WithGenres)?)
    }

    pub fn insert(
        &self,
        title: &str,
        author_id: EntityId,
        genre_ids: &[EntityId],
    ) -> ServiceResult<Book> {
        let (author, genres) = self.resolve_references(author_id, genre_ids)?;
        let saved = self.books.save(&Book::unsaved(title, author, genres))?;
        info!("event=book_insert module=service status=ok id={}", saved.id);
        Ok(saved)
    }

    /// Replaces title, author and the full genre set of an existing book.
    pub fn update(
        &self,
        id: EntityId,
        title: &str,
        author_id: EntityId,
        genre_ids: &[EntityId],
    ) -> ServiceResult<Book> {
        if self.books.find_by_id(id, BookFetch::Summary)?.is_none() {
            return Err(ServiceError::not_found(EntityKind::Book, id));
        }

        let (author, genres) = self.resolve_references(author_id, genre_ids)?;
        let saved = self.books.save(&Book::new(id, title, author, genres))?;
        info!("event=book_update module=service status=ok id={id}");
        Ok(saved)
    }

    pub fn delete_by_id(&self, id: EntityId) -> ServiceResult<()> {
        self.books.delete_by_id(id)?;
        Ok(())
    }

    fn resolve_references(
        &self,
        author_id: EntityId,
        genre_ids: &[EntityId],
    ) -> ServiceResult<(Author, Vec<Genre>)> {
        let unique_ids: BTreeSet<EntityId> = genre_ids.iter().copied().collect();
        if unique_ids.is_empty() {
            return Err(ServiceError::Validation(
                "Genres ids must not be null".to_string(),
            ));
        }

        let author = self
            .authors
            .find_by_id(author_id)?
            .ok_or_else(|| ServiceError::not_found(EntityKind::Author, author_id))?;

        let genres = self
            .genres
            .find_all_by_ids(&unique_ids.iter().copied().collect::<Vec<_>>())?;
        if genres.len() != unique_ids.len() {
            return Err(ServiceError::NotFound(format!(
                "One or all genres with ids {:?} not found",
                unique_ids
            )));
        }

        Ok((author, genres))
    }
}

#[cfg(test)]
mod tests {
    use super::BookService;
    use crate::repo::memory::{
        MemoryAuthorRepository, MemoryBookRepository, MemoryGenreRepository, MemoryStore,
    };
    use crate::service::ServiceError;

    fn service(
        store: &MemoryStore,
    ) -> BookService<MemoryBookRepository<'_>, MemoryAuthorRepository<'_>, MemoryGenreRepository<'_>>
    {
        BookService::new(
            MemoryBookRepository::new(store),
            MemoryAuthorRepository::new(store),
            MemoryGenreRepository::new(store),
        )
    }

    #[test]
    fn insert_resolves_author_and_genres() {
        let store = MemoryStore::with_demo_data();
        let service = service(&store);

        let book = service.insert("New title", 2, &[5, 1, 5]).unwrap();

        assert_eq!(book.id, 4);
        assert_eq!(book.author.full_name, "Author_2");
        assert_eq!(
            book.genres.iter().map(|genre| genre.id).collect::<Vec<_>>(),
            vec![1, 5]
        );
    }

    #[test]
    fn insert_with_unknown_author_is_not_found() {
        let store = MemoryStore::with_demo_data();
        let err = service(&store).insert("Title", 42, &[1]).unwrap_err();

        assert!(matches!(err, ServiceError::NotFound(ref message) if message == "Author with id 42 not found"));
    }

    #[test]
    fn insert_with_unknown_genre_is_not_found() {
        let store = MemoryStore::with_demo_data();
        let err = service(&store).insert("Title", 1, &[1, 99]).unwrap_err();

        assert_eq!(err.to_string(), "One or all genres with ids {1, 99} not found");
    }

    #[test]
    fn insert_without_genres_is_rejected() {
        let store = MemoryStore::with_demo_data();
        let err = service(&store).insert("Title", 1, &[]).unwrap_err();

        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[test]
    fn update_missing_book_is_not_found() {
        let store = MemoryStore::with_demo_data();
        let err = service(&store).update(77, "Title", 1, &[1]).unwrap_err();

        assert_eq!(err.to_string(), "Book with id 77 not found");
    }

    #[test]
    fn update_replaces_genres() {
        let store = MemoryStore::with_demo_data();
        let service = service(&store);

        service.update(1, "Renamed", 3, &[6]).unwrap();
        let loaded = service.find_by_id(1).unwrap().unwrap();

        assert_eq!(loaded.title, "Renamed");
        assert_eq!(loaded.author.id, 3);
        assert_eq!(loaded.genres.len(), 1);
        assert_eq!(loaded.genres[0].name, "Genre_6");
        assert_eq!(loaded.comments.len(), 2);
    }
}
