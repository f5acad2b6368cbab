use crate::model::author::Author;
use crate::repo::author_repo::AuthorRepository;
use crate::service::ServiceResult;

/// Read-only author listing.
pub struct AuthorService<R: AuthorRepository> {
    repo: R,
}

impl<R: AuthorRepository> AuthorService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn find_all(&self) -> ServiceResult<Vec<Author>> {
        Ok(self.repo.find_all()?)
    }
}
