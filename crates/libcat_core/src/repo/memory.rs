//! In-memory repository implementations.
//!
//! # Responsibility
//! - Serve the same repository contracts as the SQLite implementations by
//!   scanning plain vectors.
//! - Back service tests and the `memory` storage mode of the CLI.
//!
//! # Invariants
//! - Ids are assigned from per-table counters starting at 1 and never reused.
//! - Referential rules mirror the schema: a book needs an existing author and
//!   existing genres, a comment needs an existing book, deleting a book
//!   removes its comments.

use crate::db::seed::{DEMO_AUTHORS, DEMO_BOOKS, DEMO_GENRES};
use crate::model::author::Author;
use crate::model::book::Book;
use crate::model::comment::Comment;
use crate::model::genre::Genre;
use crate::model::{EntityId, EntityKind};
use crate::repo::author_repo::AuthorRepository;
use crate::repo::book_repo::{BookFetch, BookRepository};
use crate::repo::comment_repo::CommentRepository;
use crate::repo::genre_repo::GenreRepository;
use crate::repo::{RepoError, RepoResult};
use std::cell::RefCell;

#[derive(Debug, Clone)]
struct BookRow {
    id: EntityId,
    title: String,
    author_id: EntityId,
    genre_ids: Vec<EntityId>,
}

#[derive(Debug, Default)]
struct Tables {
    authors: Vec<Author>,
    genres: Vec<Genre>,
    books: Vec<BookRow>,
    comments: Vec<Comment>,
    next_author_id: EntityId,
    next_genre_id: EntityId,
    next_book_id: EntityId,
    next_comment_id: EntityId,
}

impl Tables {
    fn allocate(counter: &mut EntityId) -> EntityId {
        *counter += 1;
        *counter
    }

    fn author(&self, id: EntityId) -> Option<&Author> {
        self.authors.iter().find(|author| author.id == id)
    }

    fn genre(&self, id: EntityId) -> Option<&Genre> {
        self.genres.iter().find(|genre| genre.id == id)
    }

    fn assemble(&self, row: &BookRow, fetch: BookFetch) -> RepoResult<Book> {
        let author = self.author(row.author_id).cloned().ok_or_else(|| {
            RepoError::InvalidData(format!(
                "book {} references unknown author {}",
                row.id, row.author_id
            ))
        })?;

        let mut book = Book::new(row.id, row.title.clone(), author, Vec::new());
        if fetch != BookFetch::Summary {
            let mut genre_ids = row.genre_ids.clone();
            genre_ids.sort_unstable();
            for genre_id in genre_ids {
                let genre = self.genre(genre_id).cloned().ok_or_else(|| {
                    RepoError::InvalidData(format!(
                        "book {} links unknown genre {genre_id}",
                        row.id
                    ))
                })?;
                book.genres.push(genre);
            }
        }
        if fetch == BookFetch::Full {
            book.comments = self.comments_of(row.id);
        }
        Ok(book)
    }

    fn comments_of(&self, book_id: EntityId) -> Vec<Comment> {
        let mut comments: Vec<Comment> = self
            .comments
            .iter()
            .filter(|comment| comment.book_id == book_id)
            .cloned()
            .collect();
        comments.sort_by_key(|comment| comment.id);
        comments
    }
}

/// Shared in-memory catalog store.
///
/// Repositories borrow the store the same way SQLite repositories borrow a
/// connection, so several repositories can work on the same data.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RefCell<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store filled with the demo catalog fixture.
    pub fn with_demo_data() -> Self {
        let store = Self::new();
        {
            let mut tables = store.tables.borrow_mut();
            for id in 1..=DEMO_AUTHORS {
                tables.authors.push(Author::new(id, format!("Author_{id}")));
            }
            for id in 1..=DEMO_GENRES {
                tables.genres.push(Genre::new(id, format!("Genre_{id}")));
            }
            for id in 1..=DEMO_BOOKS {
                let genre_ids = vec![2 * id - 1, 2 * id];
                for comment_id in &genre_ids {
                    tables.comments.push(Comment::new(
                        *comment_id,
                        format!("Comment_{comment_id}"),
                        id,
                    ));
                }
                tables.books.push(BookRow {
                    id,
                    title: format!("BookTitle_{id}"),
                    author_id: id,
                    genre_ids,
                });
            }
            tables.next_author_id = DEMO_AUTHORS;
            tables.next_genre_id = DEMO_GENRES;
            tables.next_book_id = DEMO_BOOKS;
            tables.next_comment_id = 2 * DEMO_BOOKS;
        }
        store
    }

    /// Adds one author and returns it with its assigned id.
    pub fn add_author(&self, full_name: impl Into<String>) -> Author {
        let mut tables = self.tables.borrow_mut();
        let id = Tables::allocate(&mut tables.next_author_id);
        let author = Author::new(id, full_name);
        tables.authors.push(author.clone());
        author
    }

    /// Adds one genre and returns it with its assigned id.
    pub fn add_genre(&self, name: impl Into<String>) -> Genre {
        let mut tables = self.tables.borrow_mut();
        let id = Tables::allocate(&mut tables.next_genre_id);
        let genre = Genre::new(id, name);
        tables.genres.push(genre.clone());
        genre
    }
}

/// In-memory author repository.
pub struct MemoryAuthorRepository<'store> {
    store: &'store MemoryStore,
}

impl<'store> MemoryAuthorRepository<'store> {
    pub fn new(store: &'store MemoryStore) -> Self {
        Self { store }
    }
}

impl AuthorRepository for MemoryAuthorRepository<'_> {
    fn find_all(&self) -> RepoResult<Vec<Author>> {
        let mut authors = self.store.tables.borrow().authors.clone();
        authors.sort_by_key(|author| author.id);
        Ok(authors)
    }

    fn find_by_id(&self, id: EntityId) -> RepoResult<Option<Author>> {
        Ok(self.store.tables.borrow().author(id).cloned())
    }
}

/// In-memory genre repository.
pub struct MemoryGenreRepository<'store> {
    store: &'store MemoryStore,
}

impl<'store> MemoryGenreRepository<'store> {
    pub fn new(store: &'store MemoryStore) -> Self {
        Self { store }
    }
}

impl GenreRepository for MemoryGenreRepository<'_> {
    fn find_all(&self) -> RepoResult<Vec<Genre>> {
        let mut genres = self.store.tables.borrow().genres.clone();
        genres.sort_by_key(|genre| genre.id);
        Ok(genres)
    }

    fn find_all_by_ids(&self, ids: &[EntityId]) -> RepoResult<Vec<Genre>> {
        let mut genres: Vec<Genre> = self
            .store
            .tables
            .borrow()
            .genres
            .iter()
            .filter(|genre| ids.contains(&genre.id))
            .cloned()
            .collect();
        genres.sort_by_key(|genre| genre.id);
        Ok(genres)
    }
}

/// In-memory book repository.
pub struct MemoryBookRepository<'store> {
    store: &'store MemoryStore,
}

impl<'store> MemoryBookRepository<'store> {
    pub fn new(store: &'store MemoryStore) -> Self {
        Self { store }
    }
}

impl BookRepository for MemoryBookRepository<'_> {
    fn find_by_id(&self, id: EntityId, fetch: BookFetch) -> RepoResult<Option<Book>> {
        let tables = self.store.tables.borrow();
        match tables.books.iter().find(|row| row.id == id) {
            Some(row) => Ok(Some(tables.assemble(row, fetch)?)),
            None => Ok(None),
        }
    }

    fn find_all(&self, fetch: BookFetch) -> RepoResult<Vec<Book>> {
        let tables = self.store.tables.borrow();
        let mut books = tables
            .books
            .iter()
            .map(|row| tables.assemble(row, fetch))
            .collect::<RepoResult<Vec<_>>>()?;
        books.sort_by_key(|book| book.id);
        Ok(books)
    }

    fn save(&self, book: &Book) -> RepoResult<Book> {
        book.validate()?;

        let mut tables = self.store.tables.borrow_mut();
        if tables.author(book.author.id).is_none() {
            return Err(RepoError::NotFound {
                entity: EntityKind::Author,
                id: book.author.id,
            });
        }
        if let Some(missing) = book.genres.iter().find(|genre| tables.genre(genre.id).is_none()) {
            return Err(RepoError::NotFound {
                entity: EntityKind::Genre,
                id: missing.id,
            });
        }

        let id = if book.is_new() {
            let id = Tables::allocate(&mut tables.next_book_id);
            tables.books.push(BookRow {
                id,
                title: book.title.clone(),
                author_id: book.author.id,
                genre_ids: book.genre_ids(),
            });
            id
        } else {
            let row = tables
                .books
                .iter_mut()
                .find(|row| row.id == book.id)
                .ok_or(RepoError::NotFound {
                    entity: EntityKind::Book,
                    id: book.id,
                })?;
            row.title = book.title.clone();
            row.author_id = book.author.id;
            row.genre_ids = book.genre_ids();
            book.id
        };

        let mut saved = book.clone();
        saved.id = id;
        saved.genres.sort_by_key(|genre| genre.id);
        Ok(saved)
    }

    fn delete_by_id(&self, id: EntityId) -> RepoResult<()> {
        let mut tables = self.store.tables.borrow_mut();
        tables.books.retain(|row| row.id != id);
        tables.comments.retain(|comment| comment.book_id != id);
        Ok(())
    }
}

/// In-memory comment repository.
pub struct MemoryCommentRepository<'store> {
    store: &'store MemoryStore,
}

impl<'store> MemoryCommentRepository<'store> {
    pub fn new(store: &'store MemoryStore) -> Self {
        Self { store }
    }
}

impl CommentRepository for MemoryCommentRepository<'_> {
    fn find_by_id(&self, id: EntityId) -> RepoResult<Option<Comment>> {
        let tables = self.store.tables.borrow();
        Ok(tables
            .comments
            .iter()
            .find(|comment| comment.id == id)
            .cloned())
    }

    fn find_by_book_id(&self, book_id: EntityId) -> RepoResult<Vec<Comment>> {
        Ok(self.store.tables.borrow().comments_of(book_id))
    }

    fn save(&self, comment: &Comment) -> RepoResult<Comment> {
        comment.validate()?;

        let mut tables = self.store.tables.borrow_mut();
        if !tables.books.iter().any(|row| row.id == comment.book_id) {
            return Err(RepoError::NotFound {
                entity: EntityKind::Book,
                id: comment.book_id,
            });
        }

        if comment.is_new() {
            let id = Tables::allocate(&mut tables.next_comment_id);
            let saved = Comment::new(id, comment.text.clone(), comment.book_id);
            tables.comments.push(saved.clone());
            return Ok(saved);
        }

        let stored = tables
            .comments
            .iter_mut()
            .find(|stored| stored.id == comment.id)
            .ok_or(RepoError::NotFound {
                entity: EntityKind::Comment,
                id: comment.id,
            })?;
        *stored = comment.clone();
        Ok(comment.clone())
    }

    fn delete_by_id(&self, id: EntityId) -> RepoResult<()> {
        self.store
            .tables
            .borrow_mut()
            .comments
            .retain(|comment| comment.id != id);
        Ok(())
    }
}
