//! Use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into the dashboard's user actions.
//! - Return the patch each write applied so callers can mirror it locally.
//!
//! # Invariants
//! - Services only act on records owned by the calling user.
//! - Each action is one independent write; there are no cross-entity
//!   transactions and no retries.

use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod goal_service;
pub mod habit_service;
pub mod task_service;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug)]
pub enum ServiceError {
    /// Record is missing or belongs to another user.
    NotFound { collection: &'static str, id: Uuid },
    /// Progress actions are only offered on active goals.
    GoalNotActive(Uuid),
    /// Sample catalog for the collection has no entries.
    EmptyCatalog(&'static str),
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { collection, id } => write!(f, "{collection} not found: {id}"),
            Self::GoalNotActive(id) => write!(f, "goal is not active: {id}"),
            Self::EmptyCatalog(collection) => write!(f, "no sample {collection} available"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { collection, id } => Self::NotFound { collection, id },
            other => Self::Repo(other),
        }
    }
}

/// Maps a record that is absent or owned by someone else to `NotFound`.
pub(crate) fn owned<T>(
    record: Option<T>,
    owner_of: impl Fn(&T) -> Uuid,
    user_id: Uuid,
    collection: &'static str,
    id: Uuid,
) -> ServiceResult<T> {
    match record {
        Some(record) if owner_of(&record) == user_id => Ok(record),
        _ => Err(ServiceError::NotFound { collection, id }),
    }
}
