//! Core domain logic for LifeFlow.
//! This crate is the single source of truth for entity invariants and
//! dashboard metrics.

pub mod auth;
pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod metrics;
pub mod model;
pub mod repo;
pub mod sample;
pub mod service;
pub mod view;

pub use auth::{AuthError, AuthProvider, AuthState, LocalAuthProvider, SubscriptionId};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{AppConfig, ConfigError, LocalUserConfig};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use metrics::CalendarContext;
pub use model::goal::{Goal, GoalId, GoalStatus};
pub use model::habit::{Habit, HabitId, HabitLog};
pub use model::task::{Task, TaskId, TaskPriority, TaskStatus};
pub use model::user::{User, UserId};
pub use model::ValidationError;
pub use repo::{RepoError, RepoResult, SortOrder};
pub use service::{ServiceError, ServiceResult};
pub use view::shell::{Shell, Tab, ViewGate};
pub use view::{ListLimits, Notice, NoticeLevel, Services};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
