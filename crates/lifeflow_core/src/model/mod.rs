//! Domain model for the task/habit/goal dashboard.
//!
//! # Responsibility
//! - Define canonical records persisted by the data store.
//! - Own per-entity invariants through `validate()` helpers.
//!
//! # Invariants
//! - Every record is owned by exactly one `UserId`.
//! - Records are never hard-deleted; lifecycle is expressed by status fields.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod goal;
pub mod habit;
pub mod patch;
pub mod task;
pub mod user;

/// Validation failures shared by all domain records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required text field is empty after trimming.
    BlankField(&'static str),
    /// Task completion timestamp does not match its status.
    TaskCompletionMismatch,
    /// Habit target frequency must be at least one per day.
    InvalidTargetFrequency(u32),
    /// Habit color tag is not a `#RRGGBB` value.
    InvalidColor(String),
    /// Goal progress is outside `0..=100`.
    ProgressOutOfRange(u8),
    /// Completed goal without full progress or completion timestamp.
    IncompleteGoalCompletion,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankField(field) => write!(f, "`{field}` must not be blank"),
            Self::TaskCompletionMismatch => write!(
                f,
                "task completed_at must be set if and only if status is completed"
            ),
            Self::InvalidTargetFrequency(value) => {
                write!(f, "habit target frequency must be >= 1, got {value}")
            }
            Self::InvalidColor(value) => {
                write!(f, "habit color must look like #RRGGBB, got `{value}`")
            }
            Self::ProgressOutOfRange(value) => {
                write!(f, "goal progress must be within 0..=100, got {value}")
            }
            Self::IncompleteGoalCompletion => write!(
                f,
                "completed goal requires progress 100 and a completed_at timestamp"
            ),
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn ensure_not_blank(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::BlankField(field));
    }
    Ok(())
}
