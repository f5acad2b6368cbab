use crate::model::genre::Genre;
use crate::repo::genre_repo::GenreRepository;
use crate::service::ServiceResult;

/// Read-only genre listing.
pub struct GenreService<R: GenreRepository> {
    repo: R,
}

impl<R: GenreRepository> GenreService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn find_all(&self) -> ServiceResult<Vec<Genre>> {
        Ok(self.repo.find_all()?)
    }
}
