//! Repository layer: the per-collection data store.
//!
//! # Responsibility
//! - Expose list(filter, ordering, limit) / create / update(id, patch)
//!   contracts for tasks, habits, habit logs, goals and users.
//! - Isolate SQLite query details from services and views.
//!
//! # Invariants
//! - Write paths validate records before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Every list call is scoped to exactly one owning user.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::ValidationError;
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{Connection, ErrorCode};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod goal_repo;
pub mod habit_repo;
pub mod task_repo;
pub mod user_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Error for persistence and query operations on any collection.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    /// Target record does not exist.
    NotFound { collection: &'static str, id: Uuid },
    /// Write would break a uniqueness rule.
    Conflict(String),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { collection, id } => write!(f, "{collection} not found: {id}"),
            Self::Conflict(message) => write!(f, "conflict: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Ordering applied to list queries on `created_at`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    NewestFirst,
    OldestFirst,
}

impl SortOrder {
    pub(crate) fn order_by_sql(self) -> &'static str {
        match self {
            Self::NewestFirst => " ORDER BY created_at DESC, id ASC",
            Self::OldestFirst => " ORDER BY created_at ASC, id ASC",
        }
    }
}

pub(crate) fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }
    Ok(())
}

pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(inner, _)
            if inner.code == ErrorCode::ConstraintViolation
                && inner.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

pub(crate) fn parse_uuid(value: &str, column: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}

pub(crate) fn to_millis(value: DateTime<Utc>) -> i64 {
    value.timestamp_millis()
}

pub(crate) fn from_millis(value: i64, column: &str) -> RepoResult<DateTime<Utc>> {
    DateTime::from_timestamp_millis(value)
        .ok_or_else(|| RepoError::InvalidData(format!("invalid timestamp `{value}` in {column}")))
}

pub(crate) fn from_optional_millis(
    value: Option<i64>,
    column: &str,
) -> RepoResult<Option<DateTime<Utc>>> {
    value.map(|millis| from_millis(millis, column)).transpose()
}

pub(crate) const DAY_FORMAT: &str = "%Y-%m-%d";

pub(crate) fn day_to_db(day: NaiveDate) -> String {
    day.format(DAY_FORMAT).to_string()
}

pub(crate) fn parse_day(value: &str, column: &str) -> RepoResult<NaiveDate> {
    NaiveDate::parse_from_str(value, DAY_FORMAT)
        .map_err(|_| RepoError::InvalidData(format!("invalid day `{value}` in {column}")))
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

pub(crate) fn int_to_bool(value: i64, column: &str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid boolean value `{other}` in {column}"
        ))),
    }
}
