use libcat_core::db::open_db_in_memory;
use libcat_core::db::seed::seed_demo_data;
use libcat_core::{
    Author, AuthorRepository, Genre, GenreRepository, RepoError, SqliteAuthorRepository,
    SqliteGenreRepository,
};
use rusqlite::Connection;

fn seeded() -> Connection {
    let mut conn = open_db_in_memory().unwrap();
    seed_demo_data(&mut conn).unwrap();
    conn
}

#[test]
fn authors_are_listed_in_id_order() {
    let conn = seeded();
    let repo = SqliteAuthorRepository::try_new(&conn).unwrap();

    let authors = repo.find_all().unwrap();
    assert_eq!(
        authors,
        (1..=3)
            .map(|id| Author::new(id, format!("Author_{id}")))
            .collect::<Vec<_>>()
    );
}

#[test]
fn author_lookup_by_id() {
    let conn = seeded();
    let repo = SqliteAuthorRepository::try_new(&conn).unwrap();

    assert_eq!(
        repo.find_by_id(2).unwrap(),
        Some(Author::new(2, "Author_2"))
    );
    assert_eq!(repo.find_by_id(20).unwrap(), None);
}

#[test]
fn genres_by_ids_skips_unknown_and_duplicates() {
    let conn = seeded();
    let repo = SqliteGenreRepository::try_new(&conn).unwrap();

    let genres = repo.find_all_by_ids(&[6, 2, 2, 42]).unwrap();
    assert_eq!(
        genres,
        vec![Genre::new(2, "Genre_2"), Genre::new(6, "Genre_6")]
    );
    assert!(repo.find_all_by_ids(&[]).unwrap().is_empty());
    assert_eq!(repo.find_all().unwrap().len(), 6);
}

#[test]
fn repositories_reject_unmigrated_connection() {
    let conn = Connection::open_in_memory().unwrap();

    assert!(matches!(
        SqliteAuthorRepository::try_new(&conn),
        Err(RepoError::UninitializedConnection { .. })
    ));
    assert!(matches!(
        SqliteGenreRepository::try_new(&conn),
        Err(RepoError::UninitializedConnection { .. })
    ));
}
