//! Habits tab.

use super::{Notice, Notices, Services};
use crate::metrics::habit_metrics::{
    display_percent, habit_stats, HabitStats, HABITS_VIEW_RATIO_FLOOR,
};
use crate::model::habit::{Habit, HabitId};
use crate::model::user::User;
use crate::repo::habit_repo::HabitListQuery;
use crate::service::habit_service::HabitCompletion;
use crate::service::ServiceResult;
use log::error;
use serde::Serialize;

/// One habit card: counters plus the streak bar fill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitRow {
    pub habit: Habit,
    pub streak_percent: u32,
}

impl HabitRow {
    pub(crate) fn with_floor(habit: &Habit, floor: u32) -> Self {
        Self {
            habit: habit.clone(),
            streak_percent: display_percent(habit, floor),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitsSummary {
    pub stats: HabitStats,
    pub rows: Vec<HabitRow>,
}

#[derive(Debug, Default)]
pub struct HabitsView {
    habits: Vec<Habit>,
    pub notices: Notices,
}

impl HabitsView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    pub fn refresh(&mut self, services: &Services<'_>, user: &User) {
        match services
            .habits
            .list_habits(&HabitListQuery::active_for_user(user.id))
        {
            Ok(habits) => self.habits = habits,
            Err(err) => {
                error!("event=view_load module=view view=habits status=error error={err}");
                self.notices.push(Notice::error("Failed to load habits"));
            }
        }
    }

    pub fn summary(&self) -> HabitsSummary {
        HabitsSummary {
            stats: habit_stats(&self.habits),
            rows: self
                .habits
                .iter()
                .map(|habit| HabitRow::with_floor(habit, HABITS_VIEW_RATIO_FLOOR))
                .collect(),
        }
    }

    pub fn add(&mut self, services: &Services<'_>, user: &User, name: &str, color: &str) {
        self.on_created(services.habits.add_habit(user.id, name, color));
    }

    pub fn add_sample(&mut self, services: &Services<'_>, user: &User) {
        self.on_created(services.habits.add_sample_habit(user.id));
    }

    fn on_created(&mut self, result: ServiceResult<Habit>) {
        match result {
            Ok(habit) => {
                self.habits.insert(0, habit);
                self.notices.push(Notice::success("Habit added successfully!"));
            }
            Err(err) => {
                error!("event=view_action module=view view=habits action=add status=error error={err}");
                self.notices.push(Notice::error("Failed to add habit"));
            }
        }
    }

    /// Marks `habit_id` done for today.
    pub fn complete(&mut self, services: &Services<'_>, user: &User, habit_id: HabitId) {
        match services.habits.complete_today(user.id, habit_id) {
            Ok(HabitCompletion::Completed { streak, .. }) => {
                if let Some(habit) = self.habits.iter_mut().find(|habit| habit.id == habit_id) {
                    streak.as_patch().apply_to(habit);
                }
                self.notices.push(Notice::success(format!(
                    "Habit completed! {} day streak!",
                    streak.current_streak
                )));
            }
            Ok(HabitCompletion::AlreadyCompletedToday { .. }) => {
                self.notices
                    .push(Notice::error("Habit already completed today!"));
            }
            Err(err) => {
                error!(
                    "event=view_action module=view view=habits action=complete status=error habit_id={habit_id} error={err}"
                );
                self.notices
                    .push(Notice::error("Failed to mark habit complete"));
            }
        }
    }
}
