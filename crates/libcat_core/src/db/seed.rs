//! Demo catalog fixture.
//!
//! Book `n` (1..=3) is written by `Author_n`, carries genres `2n-1` and `2n`
//! and has comments `Comment_{2n-1}` and `Comment_{2n}`.

use super::DbResult;
use log::info;
use rusqlite::{params, Connection};

pub const DEMO_AUTHORS: i64 = 3;
pub const DEMO_GENRES: i64 = 6;
pub const DEMO_BOOKS: i64 = 3;

/// Inserts the demo catalog when the `books` table is empty.
///
/// Authors, genres and comments left over from an earlier seed are kept as
/// they are; only missing fixture rows are added. Returns `true` when the demo
/// books were inserted, `false` when the catalog already had books. Runs in a
/// single transaction.
pub fn seed_demo_data(conn: &mut Connection) -> DbResult<bool> {
    let existing: i64 = conn.query_row("SELECT COUNT(*) FROM books;", [], |row| row.get(0))?;
    if existing > 0 {
        info!("event=db_seed module=db status=skipped existing_books={existing}");
        return Ok(false);
    }

    let tx = conn.transaction()?;
    for id in 1..=DEMO_AUTHORS {
        tx.execute(
            "INSERT OR IGNORE INTO authors (id, full_name) VALUES (?1, ?2);",
            params![id, format!("Author_{id}")],
        )?;
    }
    for id in 1..=DEMO_GENRES {
        tx.execute(
            "INSERT OR IGNORE INTO genres (id, name) VALUES (?1, ?2);",
            params![id, format!("Genre_{id}")],
        )?;
    }
    for id in 1..=DEMO_BOOKS {
        tx.execute(
            "INSERT INTO books (id, title, author_id) VALUES (?1, ?2, ?3);",
            params![id, format!("BookTitle_{id}"), id],
        )?;
        for genre_id in [2 * id - 1, 2 * id] {
            tx.execute(
                "INSERT INTO books_genres (book_id, genre_id) VALUES (?1, ?2);",
                params![id, genre_id],
            )?;
            tx.execute(
                "INSERT OR IGNORE INTO comments (id, text, book_id) VALUES (?1, ?2, ?3);",
                params![genre_id, format!("Comment_{genre_id}"), id],
            )?;
        }
    }
    tx.commit()?;

    info!(
        "event=db_seed module=db status=ok authors={DEMO_AUTHORS} genres={DEMO_GENRES} books={DEMO_BOOKS}"
    );
    Ok(true)
}
