//! Genre repository contracts and SQLite implementation.

use crate::model::genre::Genre;
use crate::model::EntityId;
use crate::repo::{ensure_connection_ready, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, Row};
use std::collections::BTreeSet;

const GENRE_COLUMNS: &[&str] = &["id", "name"];

/// Repository interface for genre lookups.
pub trait GenreRepository {
    /// Returns all genres ordered by id.
    fn find_all(&self) -> RepoResult<Vec<Genre>>;
    /// Returns the genres whose ids are listed, ordered by id.
    ///
    /// Unknown ids are skipped; callers compare lengths to detect them.
    fn find_all_by_ids(&self, ids: &[EntityId]) -> RepoResult<Vec<Genre>>;
}

/// SQLite-backed genre repository.
pub struct SqliteGenreRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteGenreRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &[("genres", GENRE_COLUMNS)])?;
        Ok(Self { conn })
    }
}

impl GenreRepository for SqliteGenreRepository<'_> {
    fn find_all(&self) -> RepoResult<Vec<Genre>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM genres ORDER BY id ASC;")?;
        let rows = stmt.query_map([], parse_genre_row)?;
        let genres = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(genres)
    }

    fn find_all_by_ids(&self, ids: &[EntityId]) -> RepoResult<Vec<Genre>> {
        let unique: BTreeSet<EntityId> = ids.iter().copied().collect();
        if unique.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; unique.len()].join(", ");
        let sql = format!("SELECT id, name FROM genres WHERE id IN ({placeholders}) ORDER BY id ASC;");
        let bind_values = unique.into_iter().map(Value::Integer);

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(bind_values), parse_genre_row)?;
        let genres = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(genres)
    }
}

pub(crate) fn parse_genre_row(row: &Row<'_>) -> rusqlite::Result<Genre> {
    Ok(Genre {
        id: row.get("id")?,
        name: row.get("name")?,
    })
}

impl<R: GenreRepository + ?Sized> GenreRepository for Box<R> {
    fn find_all(&self) -> RepoResult<Vec<Genre>> {
        (**self).find_all()
    }

    fn find_all_by_ids(&self, ids: &[EntityId]) -> RepoResult<Vec<Genre>> {
        (**self).find_all_by_ids(ids)
    }
}
