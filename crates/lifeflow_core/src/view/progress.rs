//! Progress tab: weekly completions, priority mix, habit and goal overview.

use super::habits::HabitRow;
use super::{Notice, Notices, Services};
use crate::metrics::goal_metrics::{goal_stats, GoalScope, GoalStats};
use crate::metrics::habit_metrics::{habit_stats, HabitStats, OVERVIEW_RATIO_FLOOR};
use crate::metrics::task_metrics::{
    priority_distribution, task_stats, weekly_completions, PriorityDistribution, TaskStats,
    WeeklySeries,
};
use crate::metrics::CalendarContext;
use crate::model::goal::Goal;
use crate::model::habit::Habit;
use crate::model::task::Task;
use crate::model::user::User;
use crate::repo::goal_repo::GoalListQuery;
use crate::repo::habit_repo::HabitListQuery;
use crate::repo::task_repo::TaskListQuery;
use crate::service::ServiceResult;
use log::error;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummary {
    pub tasks: TaskStats,
    pub weekly: WeeklySeries,
    pub priorities: PriorityDistribution,
    pub habits: HabitStats,
    pub habit_rows: Vec<HabitRow>,
    /// Average progress counts active goals only.
    pub goals: GoalStats,
}

#[derive(Debug, Default)]
pub struct ProgressView {
    tasks: Vec<Task>,
    habits: Vec<Habit>,
    goals: Vec<Goal>,
    pub notices: Notices,
}

impl ProgressView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn refresh(&mut self, services: &Services<'_>, user: &User) {
        match load_all(services, user) {
            Ok((tasks, habits, goals)) => {
                self.tasks = tasks;
                self.habits = habits;
                self.goals = goals;
            }
            Err(err) => {
                error!("event=view_load module=view view=progress status=error error={err}");
                self.notices
                    .push(Notice::error("Failed to load progress data"));
            }
        }
    }

    pub fn summary(&self, ctx: &CalendarContext) -> ProgressSummary {
        ProgressSummary {
            tasks: task_stats(&self.tasks, ctx),
            weekly: weekly_completions(&self.tasks, ctx),
            priorities: priority_distribution(&self.tasks),
            habits: habit_stats(&self.habits),
            habit_rows: self
                .habits
                .iter()
                .map(|habit| HabitRow::with_floor(habit, OVERVIEW_RATIO_FLOOR))
                .collect(),
            goals: goal_stats(&self.goals, GoalScope::ActiveOnly),
        }
    }
}

fn load_all(
    services: &Services<'_>,
    user: &User,
) -> ServiceResult<(Vec<Task>, Vec<Habit>, Vec<Goal>)> {
    let tasks = services
        .tasks
        .list_tasks(&TaskListQuery::for_user(user.id))?;
    let habits = services
        .habits
        .list_habits(&HabitListQuery::active_for_user(user.id))?;
    let goals = services
        .goals
        .list_goals(&GoalListQuery::for_user(user.id))?;
    Ok((tasks, habits, goals))
}
