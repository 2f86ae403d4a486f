//! Goals tab.

use super::{Notice, Notices, Services};
use crate::metrics::goal_metrics::{goal_stats, is_past_due, GoalScope, GoalStats};
use crate::metrics::CalendarContext;
use crate::model::goal::{Goal, GoalId, GoalStatus};
use crate::model::patch::GoalPatch;
use crate::model::user::User;
use crate::repo::goal_repo::GoalListQuery;
use crate::service::ServiceResult;
use log::error;
use serde::Serialize;

/// Progress change requested on an active goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalAction {
    Add(u32),
    Set(u32),
    Complete,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalRow {
    pub goal: Goal,
    pub past_due: bool,
    /// Progress buttons are shown only for active goals.
    pub can_progress: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalsSummary {
    pub stats: GoalStats,
    pub rows: Vec<GoalRow>,
}

#[derive(Debug, Default)]
pub struct GoalsView {
    goals: Vec<Goal>,
    pub notices: Notices,
}

impl GoalsView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub fn refresh(&mut self, services: &Services<'_>, user: &User) {
        match services
            .goals
            .list_goals(&GoalListQuery::for_user(user.id))
        {
            Ok(goals) => self.goals = goals,
            Err(err) => {
                error!("event=view_load module=view view=goals status=error error={err}");
                self.notices.push(Notice::error("Failed to load goals"));
            }
        }
    }

    /// Stats average over all goals, not only active ones.
    pub fn summary(&self, ctx: &CalendarContext) -> GoalsSummary {
        GoalsSummary {
            stats: goal_stats(&self.goals, GoalScope::All),
            rows: self
                .goals
                .iter()
                .map(|goal| GoalRow {
                    goal: goal.clone(),
                    past_due: is_past_due(goal, ctx.now),
                    can_progress: goal.is_active(),
                })
                .collect(),
        }
    }

    pub fn add(&mut self, services: &Services<'_>, user: &User, title: &str) {
        self.on_created(services.goals.add_goal(user.id, title));
    }

    pub fn add_sample(&mut self, services: &Services<'_>, user: &User) {
        self.on_created(services.goals.add_sample_goal(user.id));
    }

    fn on_created(&mut self, result: ServiceResult<Goal>) {
        match result {
            Ok(goal) => {
                self.goals.insert(0, goal);
                self.notices.push(Notice::success("Goal added successfully!"));
            }
            Err(err) => {
                error!("event=view_action module=view view=goals action=add status=error error={err}");
                self.notices.push(Notice::error("Failed to add goal"));
            }
        }
    }

    pub fn apply(
        &mut self,
        services: &Services<'_>,
        user: &User,
        goal_id: GoalId,
        action: GoalAction,
    ) {
        let result: ServiceResult<GoalPatch> = match action {
            GoalAction::Add(step) => services.goals.add_progress(user.id, goal_id, step),
            GoalAction::Set(value) => services.goals.set_progress(user.id, goal_id, value),
            GoalAction::Complete => services.goals.complete_goal(user.id, goal_id),
        };

        match result {
            Ok(patch) => {
                if let Some(goal) = self.goals.iter_mut().find(|goal| goal.id == goal_id) {
                    patch.apply_to(goal);
                }
                if patch.status == Some(GoalStatus::Completed) {
                    self.notices
                        .push(Notice::success("Goal completed! Congratulations!"));
                } else {
                    self.notices.push(Notice::success("Progress updated!"));
                }
            }
            Err(err) => {
                error!(
                    "event=view_action module=view view=goals action=progress status=error goal_id={goal_id} error={err}"
                );
                self.notices.push(Notice::error("Failed to update goal"));
            }
        }
    }
}
