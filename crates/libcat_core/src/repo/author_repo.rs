//! Author repository contracts and SQLite implementation.

use crate::model::author::Author;
use crate::model::EntityId;
use crate::repo::{ensure_connection_ready, RepoResult};
use rusqlite::{Connection, OptionalExtension, Row};

const AUTHOR_COLUMNS: &[&str] = &["id", "full_name"];

/// Repository interface for author lookups.
pub trait AuthorRepository {
    /// Returns all authors ordered by id.
    fn find_all(&self) -> RepoResult<Vec<Author>>;
    fn find_by_id(&self, id: EntityId) -> RepoResult<Option<Author>>;
}

/// SQLite-backed author repository.
pub struct SqliteAuthorRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAuthorRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &[("authors", AUTHOR_COLUMNS)])?;
        Ok(Self { conn })
    }
}

impl AuthorRepository for SqliteAuthorRepository<'_> {
    fn find_all(&self) -> RepoResult<Vec<Author>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, full_name FROM authors ORDER BY id ASC;")?;
        let rows = stmt.query_map([], parse_author_row)?;
        let authors = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(authors)
    }

    fn find_by_id(&self, id: EntityId) -> RepoResult<Option<Author>> {
        let author = self
            .conn
            .query_row(
                "SELECT id, full_name FROM authors WHERE id = ?1;",
                [id],
                parse_author_row,
            )
            .optional()?;
        Ok(author)
    }
}

fn parse_author_row(row: &Row<'_>) -> rusqlite::Result<Author> {
    Ok(Author {
        id: row.get("id")?,
        full_name: row.get("full_name")?,
    })
}

impl<R: AuthorRepository + ?Sized> AuthorRepository for Box<R> {
    fn find_all(&self) -> RepoResult<Vec<Author>> {
        (**self).find_all()
    }

    fn find_by_id(&self, id: EntityId) -> RepoResult<Option<Author>> {
        (**self).find_by_id(id)
    }
}
