//! Catalog use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Translate missing-entity lookups into one `NotFound` failure.
//! - Keep front-ends decoupled from storage details.
//!
//! # Invariants
//! - Services never bypass repository validation/persistence contracts.
//! - Faults other than missing entities and validation pass through as
//!   `ServiceError::Repo` unchanged.

pub mod author_service;
pub mod book_service;
pub mod comment_service;
pub mod genre_service;
pub mod student_service;

use crate::model::{EntityId, EntityKind};
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for catalog use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Referenced entity does not exist. Carries the user-facing message.
    NotFound(String),
    /// Input rejected before reaching storage.
    Validation(String),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Console IO failure.
    Io(std::io::Error),
}

impl ServiceError {
    pub(crate) fn not_found(entity: EntityKind, id: EntityId) -> Self {
        Self::NotFound(format!("{entity} with id {id} not found"))
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(message) => f.write_str(message),
            Self::Validation(message) => f.write_str(message),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { entity, id } => Self::not_found(entity, id),
            RepoError::Validation(err) => Self::Validation(err.to_string()),
            other => Self::Repo(other),
        }
    }
}

impl From<std::io::Error> for ServiceError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}
