//! Goal use-case service.

use super::{owned, ServiceError, ServiceResult};
use crate::clock::Clock;
use crate::metrics::goal_metrics::{increment_patch, progress_patch};
use crate::model::goal::{Goal, GoalId, GOAL_PROGRESS_MAX};
use crate::model::patch::GoalPatch;
use crate::model::user::UserId;
use crate::repo::goal_repo::{GoalListQuery, GoalRepository};
use crate::sample::SAMPLE_GOALS;
use log::info;
use rand::seq::SliceRandom;

pub struct GoalService<R: GoalRepository, C: Clock> {
    repo: R,
    clock: C,
}

impl<R: GoalRepository, C: Clock> GoalService<R, C> {
    pub fn new(repo: R, clock: C) -> Self {
        Self { repo, clock }
    }

    pub fn list_goals(&self, query: &GoalListQuery) -> ServiceResult<Vec<Goal>> {
        Ok(self.repo.list_goals(query)?)
    }

    pub fn add_goal(&self, user_id: UserId, title: impl Into<String>) -> ServiceResult<Goal> {
        self.create(Goal::new(user_id, title, self.clock.now()))
    }

    pub fn add_sample_goal(&self, user_id: UserId) -> ServiceResult<Goal> {
        let sample = SAMPLE_GOALS
            .choose(&mut rand::thread_rng())
            .ok_or(ServiceError::EmptyCatalog("goal"))?;
        self.create(sample.build(user_id, self.clock.now()))
    }

    /// Sets progress to `requested` (clamped to 100).
    pub fn set_progress(
        &self,
        user_id: UserId,
        goal_id: GoalId,
        requested: u32,
    ) -> ServiceResult<GoalPatch> {
        self.active_goal(user_id, goal_id)?;
        self.write(goal_id, progress_patch(requested, self.clock.now()))
    }

    /// Adds `step` percentage points to the stored progress.
    pub fn add_progress(
        &self,
        user_id: UserId,
        goal_id: GoalId,
        step: u32,
    ) -> ServiceResult<GoalPatch> {
        let goal = self.active_goal(user_id, goal_id)?;
        self.write(goal_id, increment_patch(&goal, step, self.clock.now()))
    }

    pub fn complete_goal(&self, user_id: UserId, goal_id: GoalId) -> ServiceResult<GoalPatch> {
        self.set_progress(user_id, goal_id, u32::from(GOAL_PROGRESS_MAX))
    }

    fn active_goal(&self, user_id: UserId, goal_id: GoalId) -> ServiceResult<Goal> {
        let goal = owned(
            self.repo.get_goal(goal_id)?,
            |goal| goal.user_id,
            user_id,
            "goal",
            goal_id,
        )?;
        if !goal.is_active() {
            return Err(ServiceError::GoalNotActive(goal_id));
        }
        Ok(goal)
    }

    fn write(&self, goal_id: GoalId, patch: GoalPatch) -> ServiceResult<GoalPatch> {
        self.repo.update_goal(goal_id, &patch)?;
        info!(
            "event=goal_update module=service status=ok goal_id={goal_id} progress={} completed={}",
            patch.progress.unwrap_or_default(),
            patch.status.is_some()
        );
        Ok(patch)
    }

    fn create(&self, goal: Goal) -> ServiceResult<Goal> {
        let created = self.repo.create_goal(&goal)?;
        info!(
            "event=goal_create module=service status=ok goal_id={}",
            created.id
        );
        Ok(created)
    }
}
