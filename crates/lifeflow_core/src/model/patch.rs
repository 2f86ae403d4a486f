//! Partial-update payloads shared by the store and view snapshots.
//!
//! The same patch value is written to the store and then replayed on the
//! locally held snapshot, so both sides go through `apply_to`.

use super::goal::{Goal, GoalStatus};
use super::habit::Habit;
use super::task::{Task, TaskStatus};
use chrono::{DateTime, Utc};

/// Partial update for a task. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub status: Option<TaskStatus>,
    /// `Some(None)` clears the completion timestamp.
    pub completed_at: Option<Option<DateTime<Utc>>>,
}

impl TaskPatch {
    /// Patch that completes (`true`) or reopens (`false`) a task.
    pub fn completion(completed: bool, now: DateTime<Utc>) -> Self {
        if completed {
            Self {
                status: Some(TaskStatus::Completed),
                completed_at: Some(Some(now)),
            }
        } else {
            Self {
                status: Some(TaskStatus::Pending),
                completed_at: Some(None),
            }
        }
    }

    pub fn apply_to(&self, task: &mut Task) {
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(completed_at) = self.completed_at {
            task.completed_at = completed_at;
        }
    }
}

/// Partial update for a habit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HabitPatch {
    pub current_streak: Option<u32>,
    pub best_streak: Option<u32>,
    pub is_active: Option<bool>,
}

impl HabitPatch {
    pub fn streaks(current_streak: u32, best_streak: u32) -> Self {
        Self {
            current_streak: Some(current_streak),
            best_streak: Some(best_streak),
            is_active: None,
        }
    }

    pub fn apply_to(&self, habit: &mut Habit) {
        if let Some(current_streak) = self.current_streak {
            habit.current_streak = current_streak;
        }
        if let Some(best_streak) = self.best_streak {
            habit.best_streak = best_streak;
        }
        if let Some(is_active) = self.is_active {
            habit.is_active = is_active;
        }
    }
}

/// Partial update for a goal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoalPatch {
    pub progress: Option<u8>,
    pub status: Option<GoalStatus>,
    pub completed_at: Option<Option<DateTime<Utc>>>,
}

impl GoalPatch {
    pub fn apply_to(&self, goal: &mut Goal) {
        if let Some(progress) = self.progress {
            goal.progress = progress;
        }
        if let Some(status) = self.status {
            goal.status = status;
        }
        if let Some(completed_at) = self.completed_at {
            goal.completed_at = completed_at;
        }
    }
}
