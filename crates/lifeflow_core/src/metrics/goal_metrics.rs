//! Goal progress transitions and aggregates.

use super::rounded_mean;
use crate::model::goal::{Goal, GoalStatus, GOAL_PROGRESS_MAX};
use crate::model::patch::GoalPatch;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Quick increments offered for active goals.
pub const PROGRESS_STEPS: [u8; 2] = [10, 25];

/// Which goals feed the average progress figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalScope {
    All,
    ActiveOnly,
}

impl GoalScope {
    fn includes(self, goal: &Goal) -> bool {
        match self {
            Self::All => true,
            Self::ActiveOnly => goal.is_active(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalStats {
    pub total: u32,
    pub active: u32,
    pub completed: u32,
    pub paused: u32,
    pub average_progress: u32,
}

/// Clamps a requested progress value to `0..=100`.
pub fn clamp_progress(requested: u32) -> u8 {
    u8::try_from(requested.min(u32::from(GOAL_PROGRESS_MAX))).unwrap_or(GOAL_PROGRESS_MAX)
}

/// Patch produced by setting progress to `requested`.
///
/// Reaching 100 moves the goal to `completed` and stamps `now`; lower values
/// only change `progress` and leave status untouched.
pub fn progress_patch(requested: u32, now: DateTime<Utc>) -> GoalPatch {
    let progress = clamp_progress(requested);
    if progress >= GOAL_PROGRESS_MAX {
        GoalPatch {
            progress: Some(progress),
            status: Some(GoalStatus::Completed),
            completed_at: Some(Some(now)),
        }
    } else {
        GoalPatch {
            progress: Some(progress),
            ..GoalPatch::default()
        }
    }
}

/// Patch for adding `step` percentage points to the goal's progress.
pub fn increment_patch(goal: &Goal, step: u32, now: DateTime<Utc>) -> GoalPatch {
    progress_patch(u32::from(goal.progress).saturating_add(step), now)
}

/// `round(mean(progress))` over `scope`; 0 when the subset is empty.
pub fn average_progress(goals: &[Goal], scope: GoalScope) -> u32 {
    let (sum, count) = goals
        .iter()
        .filter(|goal| scope.includes(goal))
        .fold((0_u64, 0_u64), |(sum, count), goal| {
            (sum + u64::from(goal.progress), count + 1)
        });
    rounded_mean(sum, count)
}

pub fn goal_stats(goals: &[Goal], scope: GoalScope) -> GoalStats {
    let count_status = |status: GoalStatus| {
        let count = goals.iter().filter(|goal| goal.status == status).count();
        u32::try_from(count).unwrap_or(u32::MAX)
    };
    GoalStats {
        total: u32::try_from(goals.len()).unwrap_or(u32::MAX),
        active: count_status(GoalStatus::Active),
        completed: count_status(GoalStatus::Completed),
        paused: count_status(GoalStatus::Paused),
        average_progress: average_progress(goals, scope),
    }
}

/// True when an unfinished goal's target date has already passed.
pub fn is_past_due(goal: &Goal, now: DateTime<Utc>) -> bool {
    goal.status != GoalStatus::Completed && goal.target_date.is_some_and(|target| target < now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use uuid::Uuid;

    fn goal(progress: u8, status: GoalStatus) -> Goal {
        let mut goal = Goal::new(Uuid::new_v4(), "Save for trip", Utc::now());
        goal.progress = progress;
        goal.status = status;
        if status == GoalStatus::Completed {
            goal.completed_at = Some(Utc::now());
        }
        goal
    }

    #[test]
    fn increment_past_hundred_completes_goal() {
        let now = Utc::now();
        let mut g = goal(90, GoalStatus::Active);
        increment_patch(&g, 25, now).apply_to(&mut g);
        assert_eq!(g.progress, 100);
        assert_eq!(g.status, GoalStatus::Completed);
        assert_eq!(g.completed_at, Some(now));
        g.validate().unwrap();
    }

    #[test]
    fn values_below_hundred_never_complete() {
        let now = Utc::now();
        for requested in [0, 1, 50, 99] {
            let patch = progress_patch(requested, now);
            assert_eq!(patch.status, None);
            assert_eq!(patch.completed_at, None);
        }
        for requested in [100, 101, 250, u32::MAX] {
            let patch = progress_patch(requested, now);
            assert_eq!(patch.progress, Some(100));
            assert_eq!(patch.status, Some(GoalStatus::Completed));
            assert_eq!(patch.completed_at, Some(Some(now)));
        }
    }

    #[test]
    fn average_progress_respects_scope() {
        let goals = vec![
            goal(20, GoalStatus::Active),
            goal(100, GoalStatus::Completed),
            goal(45, GoalStatus::Active),
            goal(10, GoalStatus::Paused),
        ];
        assert_eq!(average_progress(&goals, GoalScope::All), 44);
        assert_eq!(average_progress(&goals, GoalScope::ActiveOnly), 33);
        assert_eq!(average_progress(&[], GoalScope::All), 0);

        let stats = goal_stats(&goals, GoalScope::ActiveOnly);
        assert_eq!(stats.active, 2);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.paused, 1);
    }

    #[test]
    fn past_due_ignores_completed_goals() {
        let now = Utc::now();
        let mut active = goal(30, GoalStatus::Active);
        active.target_date = Some(now - Duration::days(1));
        assert!(is_past_due(&active, now));

        let mut done = goal(100, GoalStatus::Completed);
        done.target_date = Some(now - Duration::days(1));
        assert!(!is_past_due(&done, now));
    }
}
