//! Comment repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Every stored comment references an existing book (schema FK).
//! - Comments of one book are listed in id order.

use crate::model::comment::Comment;
use crate::model::{EntityId, EntityKind};
use crate::repo::{ensure_connection_ready, RepoError, RepoResult};
use log::{debug, info};
use rusqlite::{params, Connection, OptionalExtension, Row};

const COMMENT_COLUMNS: &[&str] = &["id", "text", "book_id"];

/// Repository interface for comment CRUD operations.
pub trait CommentRepository {
    fn find_by_id(&self, id: EntityId) -> RepoResult<Option<Comment>>;
    fn find_by_book_id(&self, book_id: EntityId) -> RepoResult<Vec<Comment>>;
    /// Inserts when `comment.id == 0`, updates otherwise. Returns the stored row.
    fn save(&self, comment: &Comment) -> RepoResult<Comment>;
    /// Deletes one comment. Missing ids are ignored.
    fn delete_by_id(&self, id: EntityId) -> RepoResult<()>;
}

impl<R: CommentRepository + ?Sized> CommentRepository for Box<R> {
    fn find_by_id(&self, id: EntityId) -> RepoResult<Option<Comment>> {
        (**self).find_by_id(id)
    }

    fn find_by_book_id(&self, book_id: EntityId) -> RepoResult<Vec<Comment>> {
        (**self).find_by_book_id(book_id)
    }

    fn save(&self, comment: &Comment) -> RepoResult<Comment> {
        (**self).save(comment)
    }

    fn delete_by_id(&self, id: EntityId) -> RepoResult<()> {
        (**self).delete_by_id(id)
    }
}

/// SQLite-backed comment repository.
pub struct SqliteCommentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCommentRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &[("comments", COMMENT_COLUMNS)])?;
        Ok(Self { conn })
    }
}

impl CommentRepository for SqliteCommentRepository<'_> {
    fn find_by_id(&self, id: EntityId) -> RepoResult<Option<Comment>> {
        let comment = self
            .conn
            .query_row(
                "SELECT id, text, book_id FROM comments WHERE id = ?1;",
                [id],
                parse_comment_row,
            )
            .optional()?;
        Ok(comment)
    }

    fn find_by_book_id(&self, book_id: EntityId) -> RepoResult<Vec<Comment>> {
        load_comments_for_book(self.conn, book_id)
    }

    fn save(&self, comment: &Comment) -> RepoResult<Comment> {
        comment.validate()?;

        if comment.is_new() {
            self.conn.execute(
                "INSERT INTO comments (text, book_id) VALUES (?1, ?2);",
                params![comment.text.as_str(), comment.book_id],
            )?;
            let id = self.conn.last_insert_rowid();
            info!("event=comment_save module=repo status=ok op=insert id={id}");
            return Ok(Comment::new(id, comment.text.clone(), comment.book_id));
        }

        let changed = self.conn.execute(
            "UPDATE comments SET text = ?1, book_id = ?2 WHERE id = ?3;",
            params![comment.text.as_str(), comment.book_id, comment.id],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: EntityKind::Comment,
                id: comment.id,
            });
        }

        info!(
            "event=comment_save module=repo status=ok op=update id={}",
            comment.id
        );
        Ok(comment.clone())
    }

    fn delete_by_id(&self, id: EntityId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM comments WHERE id = ?1;", [id])?;
        debug!("event=comment_delete module=repo status=ok id={id} changed={changed}");
        Ok(())
    }
}

/// Loads all comments owned by one book in id order.
pub(crate) fn load_comments_for_book(
    conn: &Connection,
    book_id: EntityId,
) -> RepoResult<Vec<Comment>> {
    let mut stmt = conn.prepare(
        "SELECT id, text, book_id
         FROM comments
         WHERE book_id = ?1
         ORDER BY id ASC;",
    )?;
    let rows = stmt.query_map([book_id], parse_comment_row)?;
    let comments = rows.collect::<Result<Vec<_>, _>>()?;
    Ok(comments)
}

fn parse_comment_row(row: &Row<'_>) -> rusqlite::Result<Comment> {
    Ok(Comment {
        id: row.get("id")?,
        text: row.get("text")?,
        book_id: row.get("book_id")?,
    })
}
