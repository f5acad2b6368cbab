//! Core domain logic for the library catalog.
//! This crate owns the catalog model, its storage and its use-cases.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{init_logging, logging_status, LogLevel, LoggingError};
pub use model::author::Author;
pub use model::book::Book;
pub use model::comment::Comment;
pub use model::genre::Genre;
pub use model::student::Student;
pub use model::{EntityId, EntityKind, ValidationError, UNSAVED_ID};
pub use repo::author_repo::{AuthorRepository, SqliteAuthorRepository};
pub use repo::book_repo::{BookFetch, BookRepository, SqliteBookRepository};
pub use repo::comment_repo::{CommentRepository, SqliteCommentRepository};
pub use repo::genre_repo::{GenreRepository, SqliteGenreRepository};
pub use repo::memory::{
    MemoryAuthorRepository, MemoryBookRepository, MemoryCommentRepository, MemoryGenreRepository,
    MemoryStore,
};
pub use repo::{RepoError, RepoResult};
pub use service::author_service::AuthorService;
pub use service::book_service::BookService;
pub use service::comment_service::CommentService;
pub use service::genre_service::GenreService;
pub use service::student_service::{IoService, StreamsIoService, StudentService};
pub use service::{ServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
