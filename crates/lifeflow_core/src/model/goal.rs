//! Goal domain model.
//!
//! # Invariants
//! - `progress` stays within `0..=100`.
//! - `status == Completed` implies `progress == 100` and `completed_at` set.

use super::user::UserId;
use super::{ensure_not_blank, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable goal identifier.
pub type GoalId = Uuid;

/// Upper bound for goal progress.
pub const GOAL_PROGRESS_MAX: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    Active,
    Completed,
    Paused,
}

impl GoalStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Paused => "paused",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(Self::Active),
            "completed" => Some(Self::Completed),
            "paused" => Some(Self::Paused),
            _ => None,
        }
    }
}

/// Long-running objective tracked as a percentage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: GoalId,
    pub user_id: UserId,
    pub title: String,
    pub description: Option<String>,
    pub target_date: Option<DateTime<Utc>>,
    pub progress: u8,
    pub status: GoalStatus,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Goal {
    /// Creates an active goal with zero progress.
    pub fn new(user_id: UserId, title: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            title: title.into(),
            description: None,
            target_date: None,
            progress: 0,
            status: GoalStatus::Active,
            category: None,
            created_at,
            completed_at: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == GoalStatus::Active
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        ensure_not_blank("title", &self.title)?;
        if self.progress > GOAL_PROGRESS_MAX {
            return Err(ValidationError::ProgressOutOfRange(self.progress));
        }
        if self.status == GoalStatus::Completed
            && (self.progress != GOAL_PROGRESS_MAX || self.completed_at.is_none())
        {
            return Err(ValidationError::IncompleteGoalCompletion);
        }
        Ok(())
    }
}
