//! Book repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Assemble `Book` aggregates from `books`, `authors`, `books_genres`,
//!   `genres` and `comments` rows.
//! - Keep genre link replacement atomic with the owning book write.
//!
//! # Invariants
//! - Single-book reads use one joined query and stitch rows in order.
//! - Multi-book reads issue one flat query per table and merge in memory,
//!   so the number of statements does not grow with the number of books.
//! - Genres inside an aggregate are ordered by genre id.
//! - `save` replaces the whole genre link set in one transaction.

use crate::model::author::Author;
use crate::model::book::Book;
use crate::model::comment::Comment;
use crate::model::genre::Genre;
use crate::model::{EntityId, EntityKind};
use crate::repo::comment_repo::load_comments_for_book;
use crate::repo::genre_repo::parse_genre_row;
use crate::repo::{ensure_connection_ready, RepoError, RepoResult};
use log::{debug, info};
use rusqlite::{params, Connection, Row, Transaction};
use std::collections::{BTreeMap, HashMap};

const BOOK_COLUMNS: &[&str] = &["id", "title", "author_id"];
const BOOK_GENRE_COLUMNS: &[&str] = &["book_id", "genre_id"];
const AUTHOR_COLUMNS: &[&str] = &["id", "full_name"];
const GENRE_COLUMNS: &[&str] = &["id", "name"];
const COMMENT_COLUMNS: &[&str] = &["id", "text", "book_id"];

const BOOK_WITH_AUTHOR_SQL: &str = "SELECT
    b.id AS book_id,
    b.title AS title,
    a.id AS author_id,
    a.full_name AS full_name
FROM books b
INNER JOIN authors a ON a.id = b.author_id";

const BOOK_WITH_GENRES_SQL: &str = "SELECT
    b.id AS book_id,
    b.title AS title,
    a.id AS author_id,
    a.full_name AS full_name,
    g.id AS genre_id,
    g.name AS genre_name
FROM books b
INNER JOIN authors a ON a.id = b.author_id
LEFT JOIN books_genres bg ON bg.book_id = b.id
LEFT JOIN genres g ON g.id = bg.genre_id";

/// Fetch plan deciding which related rows are loaded with a book.
///
/// The author is always loaded; a book never exists without one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BookFetch {
    /// Book and author only. `genres` and `comments` stay empty.
    Summary,
    /// Book, author and genres.
    #[default]
    WithGenres,
    /// Book, author, genres and comments.
    Full,
}

impl BookFetch {
    fn includes_genres(self) -> bool {
        !matches!(self, Self::Summary)
    }

    fn includes_comments(self) -> bool {
        matches!(self, Self::Full)
    }
}

/// Repository interface for book CRUD operations.
pub trait BookRepository {
    fn find_by_id(&self, id: EntityId, fetch: BookFetch) -> RepoResult<Option<Book>>;
    /// Returns all books ordered by id.
    fn find_all(&self, fetch: BookFetch) -> RepoResult<Vec<Book>>;
    /// Inserts when `book.id == 0`, updates otherwise.
    ///
    /// Only the book row and its genre links are written; comments are owned
    /// by the comment repository. The returned book carries the stored id and
    /// genres in id order.
    fn save(&self, book: &Book) -> RepoResult<Book>;
    /// Deletes one book with its genre links and comments. Missing ids are ignored.
    fn delete_by_id(&self, id: EntityId) -> RepoResult<()>;
}

impl<R: BookRepository + ?Sized> BookRepository for Box<R> {
    fn find_by_id(&self, id: EntityId, fetch: BookFetch) -> RepoResult<Option<Book>> {
        (**self).find_by_id(id, fetch)
    }

    fn find_all(&self, fetch: BookFetch) -> RepoResult<Vec<Book>> {
        (**self).find_all(fetch)
    }

    fn save(&self, book: &Book) -> RepoResult<Book> {
        (**self).save(book)
    }

    fn delete_by_id(&self, id: EntityId) -> RepoResult<()> {
        (**self).delete_by_id(id)
    }
}

/// SQLite-backed book repository.
pub struct SqliteBookRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBookRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(
            conn,
            &[
                ("books", BOOK_COLUMNS),
                ("books_genres", BOOK_GENRE_COLUMNS),
                ("authors", AUTHOR_COLUMNS),
                ("genres", GENRE_COLUMNS),
                ("comments", COMMENT_COLUMNS),
            ],
        )?;
        Ok(Self { conn })
    }
}

impl BookRepository for SqliteBookRepository<'_> {
    fn find_by_id(&self, id: EntityId, fetch: BookFetch) -> RepoResult<Option<Book>> {
        let book = if fetch.includes_genres() {
            let mut stmt = self.conn.prepare(&format!(
                "{BOOK_WITH_GENRES_SQL}
                 WHERE b.id = ?1
                 ORDER BY g.id ASC;"
            ))?;
            let mut rows = stmt.query([id])?;
            let mut extractor = BookRowsExtractor::default();
            while let Some(row) = rows.next()? {
                extractor.push_row(row)?;
            }
            extractor.finish()
        } else {
            let mut stmt = self
                .conn
                .prepare(&format!("{BOOK_WITH_AUTHOR_SQL} WHERE b.id = ?1;"))?;
            let mut rows = stmt.query([id])?;
            let book = match rows.next()? {
                Some(row) => Some(parse_book_without_genres(row)?),
                None => None,
            };
            book
        };

        let Some(mut book) = book else {
            return Ok(None);
        };
        if fetch.includes_comments() {
            book.comments = load_comments_for_book(self.conn, book.id)?;
        }
        Ok(Some(book))
    }

    fn find_all(&self, fetch: BookFetch) -> RepoResult<Vec<Book>> {
        let mut books = load_books_without_genres(self.conn)?;
        if fetch.includes_genres() {
            let genres = load_genres_by_id(self.conn)?;
            let relations = load_genre_relations(self.conn)?;
            merge_books_info(&mut books, &genres, &relations)?;
        }
        if fetch.includes_comments() {
            let mut comments = load_comments_by_book(self.conn)?;
            for book in &mut books {
                book.comments = comments.remove(&book.id).unwrap_or_default();
            }
        }

        debug!(
            "event=book_find_all module=repo status=ok fetch={:?} count={}",
            fetch,
            books.len()
        );
        Ok(books)
    }

    fn save(&self, book: &Book) -> RepoResult<Book> {
        book.validate()?;

        let tx = self.conn.unchecked_transaction()?;
        let (id, op) = if book.is_new() {
            (insert_book(&tx, book)?, "insert")
        } else {
            update_book(&tx, book)?;
            (book.id, "update")
        };
        replace_genre_links(&tx, id, &book.genre_ids())?;
        tx.commit()?;

        info!(
            "event=book_save module=repo status=ok op={op} id={id} genres={}",
            book.genres.len()
        );

        let mut saved = book.clone();
        saved.id = id;
        saved.genres.sort_by_key(|genre| genre.id);
        Ok(saved)
    }

    fn delete_by_id(&self, id: EntityId) -> RepoResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM books_genres WHERE book_id = ?1;", [id])?;
        tx.execute("DELETE FROM comments WHERE book_id = ?1;", [id])?;
        let changed = tx.execute("DELETE FROM books WHERE id = ?1;", [id])?;
        tx.commit()?;

        info!("event=book_delete module=repo status=ok id={id} changed={changed}");
        Ok(())
    }
}

/// Stitches the rows of one joined book query into a single aggregate.
///
/// The first row fills book and author; every row may contribute one genre.
/// Rows produced by the outer join for a book without genres carry a NULL
/// genre and add nothing.
#[derive(Debug, Default)]
struct BookRowsExtractor {
    book: Option<Book>,
}

impl BookRowsExtractor {
    fn push_row(&mut self, row: &Row<'_>) -> RepoResult<()> {
        let book_id: EntityId = row.get("book_id")?;
        let mut book = match self.book.take() {
            Some(book) if book.id != book_id => {
                return Err(RepoError::InvalidData(format!(
                    "joined book rows mix ids {} and {book_id}",
                    book.id
                )));
            }
            Some(book) => book,
            None => parse_book_without_genres(row)?,
        };

        let genre_id: Option<EntityId> = row.get("genre_id")?;
        if let Some(genre_id) = genre_id {
            let name: Option<String> = row.get("genre_name")?;
            let name = name.ok_or_else(|| {
                RepoError::InvalidData(format!("genre {genre_id} has no name"))
            })?;
            book.genres.push(Genre::new(genre_id, name));
        }

        self.book = Some(book);
        Ok(())
    }

    fn finish(self) -> Option<Book> {
        self.book
    }
}

fn parse_book_without_genres(row: &Row<'_>) -> rusqlite::Result<Book> {
    let author = Author {
        id: row.get("author_id")?,
        full_name: row.get("full_name")?,
    };
    Ok(Book::new(
        row.get("book_id")?,
        row.get::<_, String>("title")?,
        author,
        Vec::new(),
    ))
}

fn load_books_without_genres(conn: &Connection) -> RepoResult<Vec<Book>> {
    let mut stmt = conn.prepare(&format!("{BOOK_WITH_AUTHOR_SQL} ORDER BY b.id ASC;"))?;
    let rows = stmt.query_map([], parse_book_without_genres)?;
    let books = rows.collect::<Result<Vec<_>, _>>()?;
    Ok(books)
}

fn load_genres_by_id(conn: &Connection) -> RepoResult<HashMap<EntityId, Genre>> {
    let mut stmt = conn.prepare("SELECT id, name FROM genres;")?;
    let rows = stmt.query_map([], parse_genre_row)?;
    let mut genres = HashMap::new();
    for genre in rows {
        let genre = genre?;
        genres.insert(genre.id, genre);
    }
    Ok(genres)
}

fn load_genre_relations(conn: &Connection) -> RepoResult<Vec<(EntityId, EntityId)>> {
    let mut stmt = conn.prepare(
        "SELECT book_id, genre_id
         FROM books_genres
         ORDER BY book_id ASC, genre_id ASC;",
    )?;
    let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
    let relations = rows.collect::<Result<Vec<_>, _>>()?;
    Ok(relations)
}

fn load_comments_by_book(conn: &Connection) -> RepoResult<HashMap<EntityId, Vec<Comment>>> {
    let mut stmt = conn.prepare("SELECT id, text, book_id FROM comments ORDER BY id ASC;")?;
    let rows = stmt.query_map([], |row| {
        Ok(Comment::new(row.get(0)?, row.get::<_, String>(1)?, row.get(2)?))
    })?;
    let mut by_book: HashMap<EntityId, Vec<Comment>> = HashMap::new();
    for comment in rows {
        let comment = comment?;
        by_book.entry(comment.book_id).or_default().push(comment);
    }
    Ok(by_book)
}

fn merge_books_info(
    books: &mut [Book],
    genres: &HashMap<EntityId, Genre>,
    relations: &[(EntityId, EntityId)],
) -> RepoResult<()> {
    let mut book_genres: BTreeMap<EntityId, Vec<EntityId>> = BTreeMap::new();
    for &(book_id, genre_id) in relations {
        book_genres.entry(book_id).or_default().push(genre_id);
    }

    for book in books.iter_mut() {
        let Some(genre_ids) = book_genres.get(&book.id) else {
            continue;
        };
        let mut resolved = Vec::with_capacity(genre_ids.len());
        for genre_id in genre_ids {
            let genre = genres.get(genre_id).ok_or_else(|| {
                RepoError::InvalidData(format!(
                    "book {} links unknown genre {genre_id}",
                    book.id
                ))
            })?;
            resolved.push(genre.clone());
        }
        book.genres = resolved;
    }
    Ok(())
}

fn insert_book(tx: &Transaction<'_>, book: &Book) -> RepoResult<EntityId> {
    tx.execute(
        "INSERT INTO books (title, author_id) VALUES (?1, ?2);",
        params![book.title.as_str(), book.author.id],
    )?;
    Ok(tx.last_insert_rowid())
}

fn update_book(tx: &Transaction<'_>, book: &Book) -> RepoResult<()> {
    let changed = tx.execute(
        "UPDATE books SET title = ?1, author_id = ?2 WHERE id = ?3;",
        params![book.title.as_str(), book.author.id, book.id],
    )?;
    if changed == 0 {
        return Err(RepoError::NotFound {
            entity: EntityKind::Book,
            id: book.id,
        });
    }
    Ok(())
}

fn replace_genre_links(
    tx: &Transaction<'_>,
    book_id: EntityId,
    genre_ids: &[EntityId],
) -> RepoResult<()> {
    tx.execute("DELETE FROM books_genres WHERE book_id = ?1;", [book_id])?;
    let mut stmt = tx.prepare("INSERT INTO books_genres (book_id, genre_id) VALUES (?1, ?2);")?;
    for genre_id in genre_ids {
        stmt.execute(params![book_id, genre_id])?;
    }
    Ok(())
}
