//! Connection bootstrap.
//!
//! Every connection handed out has `foreign_keys=ON`, a 5 s busy timeout
//! and a fully migrated schema.

use super::migrations::apply_migrations;
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens (or creates) the database file at `path` and migrates it.
///
/// Missing parent directories are created first, so a fresh config can
/// point at e.g. `~/.local/share/lifeflow/lifeflow.sqlite3`.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| DbError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    open_with("file", || Connection::open(path))
}

/// Opens a migrated in-memory database; used by tests and dry runs.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_with("memory", Connection::open_in_memory)
}

fn open_with(
    mode: &'static str,
    connect: impl FnOnce() -> rusqlite::Result<Connection>,
) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode={mode}");

    let result = connect()
        .map_err(DbError::from)
        .and_then(|mut conn| configure(&mut conn).map(|()| conn));
    let duration_ms = started_at.elapsed().as_millis();

    match &result {
        Ok(_) => info!("event=db_open module=db status=ok mode={mode} duration_ms={duration_ms}"),
        Err(err) => error!(
            "event=db_open module=db status=error mode={mode} duration_ms={duration_ms} error={err}"
        ),
    }
    result
}

fn configure(conn: &mut Connection) -> DbResult<()> {
    conn.pragma_update(None, "foreign_keys", true)?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    apply_migrations(conn)
}
