//! Ordered schema migrations.
//!
//! # Invariants
//! - Versions are strictly increasing and never renumbered once shipped.
//! - All pending steps run in one transaction; `user_version` is bumped
//!   after each step inside that transaction.

use crate::db::{DbError, DbResult};
use log::{debug, info};
use rusqlite::Connection;

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "init",
        sql: include_str!("0001_init.sql"),
    },
    Migration {
        version: 2,
        name: "habit_log_day_index",
        sql: include_str!("0002_habit_log_day_index.sql"),
    },
];

/// Schema version this build writes.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Brings `conn` up to `latest_version()`.
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the file is ahead of this build.
/// - `Migration` naming the first step that failed.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from_version = current_user_version(conn)?;
    let latest = latest_version();

    if from_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from_version,
            latest_supported: latest,
        });
    }
    let pending: Vec<&Migration> = MIGRATIONS
        .iter()
        .filter(|migration| migration.version > from_version)
        .collect();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in pending {
        let step = format!(
            "{}\nPRAGMA user_version = {};",
            migration.sql, migration.version
        );
        tx.execute_batch(&step)
            .map_err(|source| DbError::Migration {
                version: migration.version,
                name: migration.name,
                source,
            })?;
        debug!(
            "event=db_migrate_step module=db status=ok version={} name={}",
            migration.version, migration.name
        );
    }
    tx.commit()?;

    info!("event=db_migrate module=db status=ok from_version={from_version} to_version={latest}");
    Ok(())
}

/// Reads `PRAGMA user_version`.
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get::<_, u32>(0))?)
}
