//! Dashboard tab: recent tasks, active habits and a goal preview.

use super::habits::HabitRow;
use super::{Notice, Notices, Services};
use crate::metrics::goal_metrics::{goal_stats, GoalScope, GoalStats};
use crate::metrics::habit_metrics::{habit_stats, HabitStats, OVERVIEW_RATIO_FLOOR};
use crate::metrics::task_metrics::{task_stats, TaskStats};
use crate::metrics::CalendarContext;
use crate::model::goal::Goal;
use crate::model::habit::Habit;
use crate::model::task::Task;
use crate::model::user::User;
use crate::repo::goal_repo::GoalListQuery;
use crate::repo::habit_repo::HabitListQuery;
use crate::repo::task_repo::TaskListQuery;
use crate::service::ServiceResult;
use log::{debug, error};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub greeting: String,
    pub tasks: TaskStats,
    pub habits: HabitStats,
    pub goals: GoalStats,
    pub recent_tasks: Vec<Task>,
    pub habit_rows: Vec<HabitRow>,
    pub goal_preview: Vec<Goal>,
}

#[derive(Debug, Default)]
pub struct DashboardView {
    tasks: Vec<Task>,
    habits: Vec<Habit>,
    goals: Vec<Goal>,
    pub notices: Notices,
}

struct Batch {
    tasks: Vec<Task>,
    habits: Vec<Habit>,
    goals: Vec<Goal>,
}

impl DashboardView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    /// Loads all three collections; the snapshot changes only if every
    /// load succeeds.
    pub fn refresh(&mut self, services: &Services<'_>, user: &User) {
        match load_batch(services, user) {
            Ok(batch) => {
                debug!(
                    "event=view_load module=view view=dashboard status=ok tasks={} habits={} goals={}",
                    batch.tasks.len(),
                    batch.habits.len(),
                    batch.goals.len()
                );
                self.tasks = batch.tasks;
                self.habits = batch.habits;
                self.goals = batch.goals;
            }
            Err(err) => {
                error!("event=view_load module=view view=dashboard status=error error={err}");
                self.notices
                    .push(Notice::error("Failed to load dashboard data"));
            }
        }
    }

    pub fn summary(&self, user: &User, ctx: &CalendarContext) -> DashboardSummary {
        DashboardSummary {
            greeting: user.greeting_name().to_string(),
            tasks: task_stats(&self.tasks, ctx),
            habits: habit_stats(&self.habits),
            goals: goal_stats(&self.goals, GoalScope::All),
            recent_tasks: self.tasks.clone(),
            habit_rows: self
                .habits
                .iter()
                .map(|habit| HabitRow::with_floor(habit, OVERVIEW_RATIO_FLOOR))
                .collect(),
            goal_preview: self.goals.clone(),
        }
    }
}

fn load_batch(services: &Services<'_>, user: &User) -> ServiceResult<Batch> {
    let tasks = services
        .tasks
        .list_tasks(&TaskListQuery::for_user(user.id).with_limit(services.limits.dashboard_tasks))?;
    let habits = services
        .habits
        .list_habits(&HabitListQuery::active_for_user(user.id))?;
    let goals = services
        .goals
        .list_goals(&GoalListQuery::for_user(user.id).with_limit(services.limits.dashboard_goals))?;
    Ok(Batch {
        tasks,
        habits,
        goals,
    })
}
