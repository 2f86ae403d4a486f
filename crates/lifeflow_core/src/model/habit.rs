//! Habit and habit-log domain models.
//!
//! # Invariants
//! - At most one `HabitLog` exists per `(habit_id, completed_date)`.
//! - `best_streak` is expected to stay >= `current_streak` but is not
//!   enforced on read, since older rows may predate the rule.

use super::user::UserId;
use super::{ensure_not_blank, ValidationError};
use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

static HEX_COLOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("valid hex color regex"));

/// Stable habit identifier.
pub type HabitId = Uuid;
/// Stable habit-log identifier.
pub type HabitLogId = Uuid;

/// Recurring daily practice with streak counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: HabitId,
    pub user_id: UserId,
    pub name: String,
    pub description: Option<String>,
    /// Completions per day.
    pub target_frequency: u32,
    pub current_streak: u32,
    pub best_streak: u32,
    /// `#RRGGBB` display tag.
    pub color: String,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
}

impl Habit {
    /// Creates an active habit with zeroed streaks and a daily target of one.
    pub fn new(
        user_id: UserId,
        name: impl Into<String>,
        color: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            name: name.into(),
            description: None,
            target_frequency: 1,
            current_streak: 0,
            best_streak: 0,
            color: color.into(),
            created_at,
            is_active: true,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        ensure_not_blank("name", &self.name)?;
        if self.target_frequency == 0 {
            return Err(ValidationError::InvalidTargetFrequency(
                self.target_frequency,
            ));
        }
        if !HEX_COLOR_RE.is_match(&self.color) {
            return Err(ValidationError::InvalidColor(self.color.clone()));
        }
        Ok(())
    }
}

/// One day's completion record for a habit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitLog {
    pub id: HabitLogId,
    pub habit_id: HabitId,
    pub user_id: UserId,
    pub completed_date: NaiveDate,
    pub completed_at: DateTime<Utc>,
}

impl HabitLog {
    pub fn new(
        habit_id: HabitId,
        user_id: UserId,
        completed_date: NaiveDate,
        completed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            habit_id,
            user_id,
            completed_date,
            completed_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Habit;
    use crate::model::ValidationError;
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn new_habit_starts_active_with_zero_streaks() {
        let habit = Habit::new(Uuid::new_v4(), "Read", "#10B981", Utc::now());
        assert!(habit.is_active);
        assert_eq!(habit.current_streak, 0);
        assert_eq!(habit.best_streak, 0);
        assert_eq!(habit.target_frequency, 1);
        habit.validate().unwrap();
    }

    #[test]
    fn validate_rejects_bad_color_and_frequency() {
        let mut habit = Habit::new(Uuid::new_v4(), "Read", "green", Utc::now());
        assert!(matches!(
            habit.validate(),
            Err(ValidationError::InvalidColor(_))
        ));

        habit.color = "#10b981".to_string();
        habit.target_frequency = 0;
        assert_eq!(
            habit.validate(),
            Err(ValidationError::InvalidTargetFrequency(0))
        );
    }
}
