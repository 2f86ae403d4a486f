//! Presentation view models.
//!
//! # Responsibility
//! - Hold each tab's transient snapshot of fetched records.
//! - Turn service outcomes into user-visible notices.
//! - Mirror successful writes onto the snapshot without re-reading.
//!
//! # Invariants
//! - Store failures never escape a view: they are logged and surfaced as an
//!   error notice, and the previous snapshot is kept.
//! - Snapshots are replaced wholesale on refresh; no merge with stale data.

use crate::clock::Clock;
use crate::config::AppConfig;
use crate::metrics::CalendarContext;
use crate::repo::goal_repo::SqliteGoalRepository;
use crate::repo::habit_repo::SqliteHabitRepository;
use crate::repo::task_repo::SqliteTaskRepository;
use crate::repo::RepoResult;
use crate::service::goal_service::GoalService;
use crate::service::habit_service::HabitService;
use crate::service::task_service::TaskService;
use rusqlite::Connection;
use serde::Serialize;

pub mod dashboard;
pub mod goals;
pub mod habits;
pub mod progress;
pub mod shell;
pub mod tasks;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Transient user-visible notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Pending notices raised by a view, drained by the front-end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notices {
    queue: Vec<Notice>,
}

impl Notices {
    pub fn push(&mut self, notice: Notice) {
        self.queue.push(notice);
    }

    pub fn drain(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.queue)
    }

    pub fn last(&self) -> Option<&Notice> {
        self.queue.last()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// Fixed list sizes used by views that show a preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListLimits {
    pub dashboard_tasks: u32,
    pub dashboard_goals: u32,
}

impl From<&AppConfig> for ListLimits {
    fn from(config: &AppConfig) -> Self {
        Self {
            dashboard_tasks: config.dashboard_task_limit,
            dashboard_goals: config.dashboard_goal_limit,
        }
    }
}

/// Services bound to one SQLite connection and one clock.
pub struct Services<'a> {
    pub tasks: TaskService<SqliteTaskRepository<'a>, &'a dyn Clock>,
    pub habits: HabitService<SqliteHabitRepository<'a>, &'a dyn Clock>,
    pub goals: GoalService<SqliteGoalRepository<'a>, &'a dyn Clock>,
    pub limits: ListLimits,
    clock: &'a dyn Clock,
}

impl<'a> Services<'a> {
    pub fn open(conn: &'a Connection, clock: &'a dyn Clock, limits: ListLimits) -> RepoResult<Self> {
        Ok(Self {
            tasks: TaskService::new(SqliteTaskRepository::try_new(conn)?, clock),
            habits: HabitService::new(SqliteHabitRepository::try_new(conn)?, clock),
            goals: GoalService::new(SqliteGoalRepository::try_new(conn)?, clock),
            limits,
            clock,
        })
    }

    /// Calendar context captured at call time.
    pub fn calendar(&self) -> CalendarContext {
        CalendarContext::from_clock(self.clock)
    }
}
