//! Habit streak arithmetic and aggregates.
//!
//! # Invariants
//! - A completion raises `current_streak` by exactly one.
//! - `best_streak` never decreases through a completion.
//! - Nothing here resets a lapsed streak; gaps are not detected.

use super::{rounded_mean, rounded_percent};
use crate::model::habit::Habit;
use crate::model::patch::HabitPatch;
use serde::Serialize;

/// Days that make up one full week of streak progress.
pub const STREAK_WEEK_DAYS: u32 = 7;

/// Ratio floor used by the habits view per-habit bar.
pub const HABITS_VIEW_RATIO_FLOOR: u32 = 1;

/// Ratio floor used by the dashboard and progress views.
pub const OVERVIEW_RATIO_FLOOR: u32 = 7;

/// Streak counters after one completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakUpdate {
    pub current_streak: u32,
    pub best_streak: u32,
}

impl StreakUpdate {
    pub fn as_patch(self) -> HabitPatch {
        HabitPatch::streaks(self.current_streak, self.best_streak)
    }
}

/// Streak counters a completion of `habit` would produce.
pub fn next_streak(habit: &Habit) -> StreakUpdate {
    let current_streak = habit.current_streak.saturating_add(1);
    StreakUpdate {
        current_streak,
        best_streak: habit.best_streak.max(current_streak),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitStats {
    pub count: u32,
    pub total_streak: u64,
    pub average_streak: u32,
    pub best_overall_streak: u32,
    /// Sum of current streaks against `count * 7` days, in percent.
    pub weekly_progress: u32,
}

pub fn habit_stats(habits: &[Habit]) -> HabitStats {
    let count = habits.len() as u64;
    let total_streak = total_streak(habits);
    HabitStats {
        count: u32::try_from(count).unwrap_or(u32::MAX),
        total_streak,
        average_streak: rounded_mean(total_streak, count),
        best_overall_streak: habits
            .iter()
            .map(|habit| habit.best_streak)
            .max()
            .unwrap_or(0),
        weekly_progress: weekly_progress(habits),
    }
}

/// `round(100 * sum(current_streak) / (count * 7))`, 0 with no habits.
pub fn weekly_progress(habits: &[Habit]) -> u32 {
    let window = habits.len() as u64 * u64::from(STREAK_WEEK_DAYS);
    rounded_percent(total_streak(habits), window)
}

/// `current / max(best, floor)` as a whole percent capped at 100.
pub fn display_percent(habit: &Habit, floor: u32) -> u32 {
    let denominator = habit.best_streak.max(floor).max(1);
    rounded_percent(
        u64::from(habit.current_streak),
        u64::from(denominator),
    )
    .min(100)
}

fn total_streak(habits: &[Habit]) -> u64 {
    habits
        .iter()
        .map(|habit| u64::from(habit.current_streak))
        .sum()
}
