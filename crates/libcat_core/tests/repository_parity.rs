//! SQLite and in-memory repositories must agree on the same operations.

use libcat_core::db::open_db_in_memory;
use libcat_core::db::seed::seed_demo_data;
use libcat_core::{
    Author, Book, BookFetch, BookRepository, Comment, CommentRepository, Genre,
    MemoryBookRepository, MemoryCommentRepository, MemoryStore, SqliteBookRepository,
    SqliteCommentRepository,
};

fn exercise_books(repo: &dyn BookRepository) -> Vec<Book> {
    let created = repo
        .save(&Book::unsaved(
            "Parity",
            Author::new(2, "Author_2"),
            vec![Genre::new(6, "Genre_6"), Genre::new(1, "Genre_1")],
        ))
        .unwrap();
    repo.save(&Book::new(
        2,
        "Renamed",
        Author::new(1, "Author_1"),
        vec![Genre::new(3, "Genre_3")],
    ))
    .unwrap();
    repo.delete_by_id(3).unwrap();
    assert!(repo.find_by_id(created.id, BookFetch::Full).unwrap().is_some());
    repo.find_all(BookFetch::Full).unwrap()
}

fn exercise_comments(repo: &dyn CommentRepository) -> Vec<Comment> {
    repo.save(&Comment::unsaved("fresh", 2)).unwrap();
    repo.save(&Comment::new(1, "edited", 1)).unwrap();
    repo.delete_by_id(2).unwrap();
    let mut all = repo.find_by_book_id(1).unwrap();
    all.extend(repo.find_by_book_id(2).unwrap());
    all
}

#[test]
fn book_operations_agree() {
    let mut conn = open_db_in_memory().unwrap();
    seed_demo_data(&mut conn).unwrap();
    let store = MemoryStore::with_demo_data();

    let from_sql = exercise_books(&SqliteBookRepository::try_new(&conn).unwrap());
    let from_memory = exercise_books(&MemoryBookRepository::new(&store));

    assert_eq!(from_sql, from_memory);
}

#[test]
fn comment_operations_agree() {
    let mut conn = open_db_in_memory().unwrap();
    seed_demo_data(&mut conn).unwrap();
    let store = MemoryStore::with_demo_data();

    let from_sql = exercise_comments(&SqliteCommentRepository::try_new(&conn).unwrap());
    let from_memory = exercise_comments(&MemoryCommentRepository::new(&store));

    assert_eq!(from_sql, from_memory);
}
