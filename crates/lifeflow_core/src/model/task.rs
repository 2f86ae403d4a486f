//! Task domain model.
//!
//! # Invariants
//! - `completed_at` is set if and only if `status == TaskStatus::Completed`.
//! - `title` is never blank.

use super::user::UserId;
use super::{ensure_not_blank, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable task identifier.
pub type TaskId = Uuid;

/// Task urgency bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    High,
    Medium,
    Low,
}

impl TaskPriority {
    pub const ALL: [TaskPriority; 3] = [Self::High, Self::Medium, Self::Low];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }
}

/// Task lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Completed,
    /// Stored state only; metrics derive overdue-ness from the due date.
    Overdue,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Overdue => "overdue",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "completed" => Some(Self::Completed),
            "overdue" => Some(Self::Overdue),
            _ => None,
        }
    }
}

/// Actionable to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub user_id: UserId,
    pub title: String,
    pub description: Option<String>,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub due_date: Option<DateTime<Utc>>,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub is_recurring: bool,
}

impl Task {
    /// Creates a pending, non-recurring task.
    pub fn new(
        user_id: UserId,
        title: impl Into<String>,
        priority: TaskPriority,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            title: title.into(),
            description: None,
            priority,
            status: TaskStatus::Pending,
            due_date: None,
            category: None,
            created_at,
            completed_at: None,
            is_recurring: false,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// Moves the task into `completed` (stamping `now`) or back to `pending`.
    pub fn set_completed(&mut self, completed: bool, now: DateTime<Utc>) {
        if completed {
            self.status = TaskStatus::Completed;
            self.completed_at = Some(now);
        } else {
            self.status = TaskStatus::Pending;
            self.completed_at = None;
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        ensure_not_blank("title", &self.title)?;
        if self.is_completed() != self.completed_at.is_some() {
            return Err(ValidationError::TaskCompletionMismatch);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Task, TaskPriority, TaskStatus};
    use crate::model::ValidationError;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    #[test]
    fn set_completed_toggles_timestamp_with_status() {
        let now = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
        let mut task = Task::new(Uuid::new_v4(), "ship", TaskPriority::High, now);

        task.set_completed(true, now);
        assert_eq!(task.status, TaskStatus::Completed);
        assert_eq!(task.completed_at, Some(now));
        task.validate().unwrap();

        task.set_completed(false, now);
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.completed_at, None);
        task.validate().unwrap();
    }

    #[test]
    fn validate_rejects_completion_mismatch() {
        let now = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
        let mut task = Task::new(Uuid::new_v4(), "ship", TaskPriority::Low, now);
        task.completed_at = Some(now);
        assert_eq!(task.validate(), Err(ValidationError::TaskCompletionMismatch));
    }
}
