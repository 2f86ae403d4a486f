//! Habit use-case service.
//!
//! # Invariants
//! - A habit is completed at most once per calendar day. A repeat attempt
//!   returns `HabitCompletion::AlreadyCompletedToday` and writes nothing.
//! - Streak counters are computed from the stored habit, not from a
//!   caller-held copy.

use super::{owned, ServiceError, ServiceResult};
use crate::clock::Clock;
use crate::metrics::habit_metrics::{next_streak, StreakUpdate};
use crate::model::habit::{Habit, HabitId, HabitLog};
use crate::model::user::UserId;
use crate::repo::habit_repo::{HabitListQuery, HabitRepository};
use crate::repo::RepoError;
use crate::sample::SAMPLE_HABITS;
use chrono::NaiveDate;
use log::info;
use rand::seq::SliceRandom;

/// Outcome of a "mark done today" action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HabitCompletion {
    Completed { log: HabitLog, streak: StreakUpdate },
    AlreadyCompletedToday { day: NaiveDate },
}

pub struct HabitService<R: HabitRepository, C: Clock> {
    repo: R,
    clock: C,
}

impl<R: HabitRepository, C: Clock> HabitService<R, C> {
    pub fn new(repo: R, clock: C) -> Self {
        Self { repo, clock }
    }

    pub fn list_habits(&self, query: &HabitListQuery) -> ServiceResult<Vec<Habit>> {
        Ok(self.repo.list_habits(query)?)
    }

    pub fn add_habit(
        &self,
        user_id: UserId,
        name: impl Into<String>,
        color: impl Into<String>,
    ) -> ServiceResult<Habit> {
        self.create(Habit::new(user_id, name, color, self.clock.now()))
    }

    pub fn add_sample_habit(&self, user_id: UserId) -> ServiceResult<Habit> {
        let sample = SAMPLE_HABITS
            .choose(&mut rand::thread_rng())
            .ok_or(ServiceError::EmptyCatalog("habit"))?;
        self.create(sample.build(user_id, self.clock.now()))
    }

    /// Logs today's completion and advances the streak counters.
    pub fn complete_today(
        &self,
        user_id: UserId,
        habit_id: HabitId,
    ) -> ServiceResult<HabitCompletion> {
        let habit = owned(
            self.repo.get_habit(habit_id)?,
            |habit| habit.user_id,
            user_id,
            "habit",
            habit_id,
        )?;
        let today = self.clock.today();

        if self.repo.find_log(habit_id, user_id, today)?.is_some() {
            info!(
                "event=habit_complete module=service status=rejected habit_id={habit_id} reason=already_logged"
            );
            return Ok(HabitCompletion::AlreadyCompletedToday { day: today });
        }

        let log = HabitLog::new(habit_id, user_id, today, self.clock.now());
        let log = match self.repo.create_log(&log) {
            Ok(log) => log,
            Err(RepoError::Conflict(_)) => {
                return Ok(HabitCompletion::AlreadyCompletedToday { day: today });
            }
            Err(err) => return Err(err.into()),
        };

        let streak = next_streak(&habit);
        self.repo.update_habit(habit_id, &streak.as_patch())?;
        info!(
            "event=habit_complete module=service status=ok habit_id={habit_id} current_streak={} best_streak={}",
            streak.current_streak, streak.best_streak
        );
        Ok(HabitCompletion::Completed { log, streak })
    }

    fn create(&self, habit: Habit) -> ServiceResult<Habit> {
        let created = self.repo.create_habit(&habit)?;
        info!(
            "event=habit_create module=service status=ok habit_id={}",
            created.id
        );
        Ok(created)
    }
}
