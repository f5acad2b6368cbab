//! Service wiring over the storage backend picked at startup.

use libcat_core::{
    AuthorRepository, AuthorService, BookRepository, BookService, CommentRepository,
    CommentService, GenreRepository, GenreService, MemoryAuthorRepository, MemoryBookRepository,
    MemoryCommentRepository, MemoryGenreRepository, MemoryStore, RepoResult,
    SqliteAuthorRepository, SqliteBookRepository, SqliteCommentRepository, SqliteGenreRepository,
};
use rusqlite::Connection;

type DynAuthors<'a> = Box<dyn AuthorRepository + 'a>;
type DynBooks<'a> = Box<dyn BookRepository + 'a>;
type DynComments<'a> = Box<dyn CommentRepository + 'a>;
type DynGenres<'a> = Box<dyn GenreRepository + 'a>;

/// All catalog services, borrowing one storage backend.
pub struct Catalog<'a> {
    pub authors: AuthorService<DynAuthors<'a>>,
    pub genres: GenreService<DynGenres<'a>>,
    pub books: BookService<DynBooks<'a>, DynAuthors<'a>, DynGenres<'a>>,
    pub comments: CommentService<DynComments<'a>, DynBooks<'a>>,
}

impl<'a> Catalog<'a> {
    /// Wires services over a migrated SQLite connection.
    pub fn sqlite(conn: &'a Connection) -> RepoResult<Self> {
        let authors = || -> RepoResult<DynAuthors<'a>> {
            Ok(Box::new(SqliteAuthorRepository::try_new(conn)?))
        };
        let genres = || -> RepoResult<DynGenres<'a>> {
            Ok(Box::new(SqliteGenreRepository::try_new(conn)?))
        };
        let books =
            || -> RepoResult<DynBooks<'a>> { Ok(Box::new(SqliteBookRepository::try_new(conn)?)) };
        let comments: DynComments<'a> = Box::new(SqliteCommentRepository::try_new(conn)?);

        Ok(Self {
            authors: AuthorService::new(authors()?),
            genres: GenreService::new(genres()?),
            books: BookService::new(books()?, authors()?, genres()?),
            comments: CommentService::new(comments, books()?),
        })
    }

    pub fn memory(store: &'a MemoryStore) -> Self {
        let authors = || -> DynAuthors<'a> { Box::new(MemoryAuthorRepository::new(store)) };
        let genres = || -> DynGenres<'a> { Box::new(MemoryGenreRepository::new(store)) };
        let books = || -> DynBooks<'a> { Box::new(MemoryBookRepository::new(store)) };
        let comments: DynComments<'a> = Box::new(MemoryCommentRepository::new(store));

        Self {
            authors: AuthorService::new(authors()),
            genres: GenreService::new(genres()),
            books: BookService::new(books(), authors(), genres()),
            comments: CommentService::new(comments, books()),
        }
    }
}
