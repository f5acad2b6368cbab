use libcat_core::db::open_db_in_memory;
use libcat_core::db::seed::seed_demo_data;
use libcat_core::{
    AuthorService, BookService, CommentService, GenreService, ServiceError,
    SqliteAuthorRepository, SqliteBookRepository, SqliteCommentRepository, SqliteGenreRepository,
};
use rusqlite::Connection;

fn seeded() -> Connection {
    let mut conn = open_db_in_memory().unwrap();
    seed_demo_data(&mut conn).unwrap();
    conn
}

fn book_service(
    conn: &Connection,
) -> BookService<SqliteBookRepository<'_>, SqliteAuthorRepository<'_>, SqliteGenreRepository<'_>>
{
    BookService::new(
        SqliteBookRepository::try_new(conn).unwrap(),
        SqliteAuthorRepository::try_new(conn).unwrap(),
        SqliteGenreRepository::try_new(conn).unwrap(),
    )
}

fn comment_service(
    conn: &Connection,
) -> CommentService<SqliteCommentRepository<'_>, SqliteBookRepository<'_>> {
    CommentService::new(
        SqliteCommentRepository::try_new(conn).unwrap(),
        SqliteBookRepository::try_new(conn).unwrap(),
    )
}

#[test]
fn listing_services_return_fixture() {
    let conn = seeded();

    let authors = AuthorService::new(SqliteAuthorRepository::try_new(&conn).unwrap())
        .find_all()
        .unwrap();
    let genres = GenreService::new(SqliteGenreRepository::try_new(&conn).unwrap())
        .find_all()
        .unwrap();

    assert_eq!(authors.len(), 3);
    assert_eq!(genres.len(), 6);
}

#[test]
fn book_lifecycle_through_service() {
    let conn = seeded();
    let service = book_service(&conn);

    let created = service.insert("Dune", 1, &[2, 4]).unwrap();
    let loaded = service.find_by_id(created.id).unwrap().unwrap();
    assert_eq!(loaded, created);

    let updated = service.update(created.id, "Dune Messiah", 2, &[3]).unwrap();
    assert_eq!(updated.author.full_name, "Author_2");
    assert_eq!(
        service.find_by_id(created.id).unwrap().unwrap().genres,
        updated.genres
    );

    service.delete_by_id(created.id).unwrap();
    assert!(service.find_by_id(created.id).unwrap().is_none());
    assert_eq!(service.find_all().unwrap().len(), 3);
}

#[test]
fn find_all_does_not_load_comments() {
    let conn = seeded();
    let books = book_service(&conn).find_all().unwrap();

    assert!(books.iter().all(|book| book.comments.is_empty()));
    assert!(books.iter().all(|book| book.genres.len() == 2));
}

#[test]
fn book_service_reports_missing_references() {
    let conn = seeded();
    let service = book_service(&conn);

    assert_eq!(
        service.insert("Title", 9, &[1]).unwrap_err().to_string(),
        "Author with id 9 not found"
    );
    assert_eq!(
        service.update(9, "Title", 1, &[1]).unwrap_err().to_string(),
        "Book with id 9 not found"
    );
    assert!(matches!(
        service.insert("Title", 1, &[7]).unwrap_err(),
        ServiceError::NotFound(_)
    ));
}

#[test]
fn comment_lifecycle_through_service() {
    let conn = seeded();
    let service = comment_service(&conn);

    let created = service.insert("Loved it", 1).unwrap();
    assert_eq!(service.find_all_by_book_id(1).unwrap().len(), 3);

    let updated = service.update(created.id, "Liked it").unwrap();
    assert_eq!(service.find_by_id(created.id).unwrap(), Some(updated));

    service.delete_by_id(created.id).unwrap();
    assert!(service.find_by_id(created.id).unwrap().is_none());
}

#[test]
fn comment_on_missing_book_is_not_found() {
    let conn = seeded();
    let err = comment_service(&conn).insert("hello", 12).unwrap_err();

    assert_eq!(err.to_string(), "Book with id 12 not found");
}

#[test]
fn full_book_carries_comments_added_through_service() {
    let conn = seeded();
    comment_service(&conn).insert("Third opinion", 2).unwrap();

    let book = book_service(&conn).find_by_id(2).unwrap().unwrap();
    let texts: Vec<_> = book.comments.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["Comment_3", "Comment_4", "Third opinion"]);
}
