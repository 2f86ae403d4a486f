//! Habit and habit-log repository contracts and SQLite implementation.
//!
//! # Invariants
//! - `habit_logs` holds at most one row per `(habit_id, completed_date)`;
//!   a second insert for the same day maps to `RepoError::Conflict`.

use super::{
    bool_to_int, day_to_db, ensure_connection_ready, from_millis, int_to_bool, is_unique_violation,
    parse_day, parse_uuid, to_millis, RepoError, RepoResult, SortOrder,
};
use crate::model::habit::{Habit, HabitId, HabitLog};
use crate::model::patch::HabitPatch;
use crate::model::user::UserId;
use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const HABIT_SELECT_SQL: &str = "SELECT
    id,
    user_id,
    name,
    description,
    target_frequency,
    current_streak,
    best_streak,
    color,
    created_at,
    is_active
FROM habits";

const HABIT_LOG_SELECT_SQL: &str = "SELECT
    id,
    habit_id,
    user_id,
    completed_date,
    completed_at
FROM habit_logs";

/// Filter/order/limit options for listing one user's habits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitListQuery {
    pub user_id: UserId,
    pub active_only: bool,
    pub order: SortOrder,
    pub limit: Option<u32>,
}

impl HabitListQuery {
    /// Active habits of `user_id`, newest first.
    pub fn active_for_user(user_id: UserId) -> Self {
        Self {
            user_id,
            active_only: true,
            order: SortOrder::NewestFirst,
            limit: None,
        }
    }
}

/// Repository interface for the habits and habit-log collections.
pub trait HabitRepository {
    fn create_habit(&self, habit: &Habit) -> RepoResult<Habit>;
    fn update_habit(&self, id: HabitId, patch: &HabitPatch) -> RepoResult<()>;
    fn get_habit(&self, id: HabitId) -> RepoResult<Option<Habit>>;
    fn list_habits(&self, query: &HabitListQuery) -> RepoResult<Vec<Habit>>;
    /// Looks up the log for one `(habit, user, day)` triple.
    fn find_log(
        &self,
        habit_id: HabitId,
        user_id: UserId,
        day: NaiveDate,
    ) -> RepoResult<Option<HabitLog>>;
    fn create_log(&self, log: &HabitLog) -> RepoResult<HabitLog>;
    /// Lists logs for one habit, most recent day first.
    fn list_logs(&self, habit_id: HabitId) -> RepoResult<Vec<HabitLog>>;
}

/// SQLite-backed habit repository.
pub struct SqliteHabitRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteHabitRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl HabitRepository for SqliteHabitRepository<'_> {
    fn create_habit(&self, habit: &Habit) -> RepoResult<Habit> {
        habit.validate()?;

        self.conn.execute(
            "INSERT INTO habits (
                id,
                user_id,
                name,
                description,
                target_frequency,
                current_streak,
                best_streak,
                color,
                created_at,
                is_active
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10);",
            params![
                habit.id.to_string(),
                habit.user_id.to_string(),
                habit.name.as_str(),
                habit.description.as_deref(),
                habit.target_frequency,
                habit.current_streak,
                habit.best_streak,
                habit.color.as_str(),
                to_millis(habit.created_at),
                bool_to_int(habit.is_active),
            ],
        )?;

        Ok(habit.clone())
    }

    fn update_habit(&self, id: HabitId, patch: &HabitPatch) -> RepoResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        let mut habit = load_habit(&tx, id)?.ok_or(RepoError::NotFound {
            collection: "habit",
            id,
        })?;
        patch.apply_to(&mut habit);
        habit.validate()?;

        tx.execute(
            "UPDATE habits
             SET
                current_streak = ?2,
                best_streak = ?3,
                is_active = ?4
             WHERE id = ?1;",
            params![
                id.to_string(),
                habit.current_streak,
                habit.best_streak,
                bool_to_int(habit.is_active),
            ],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn get_habit(&self, id: HabitId) -> RepoResult<Option<Habit>> {
        load_habit(self.conn, id)
    }

    fn list_habits(&self, query: &HabitListQuery) -> RepoResult<Vec<Habit>> {
        let mut sql = format!("{HABIT_SELECT_SQL} WHERE user_id = ?");
        let mut bind_values = vec![Value::Text(query.user_id.to_string())];

        if query.active_only {
            sql.push_str(" AND is_active = 1");
        }

        sql.push_str(query.order.order_by_sql());

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut habits = Vec::new();
        while let Some(row) = rows.next()? {
            habits.push(parse_habit_row(row)?);
        }
        Ok(habits)
    }

    fn find_log(
        &self,
        habit_id: HabitId,
        user_id: UserId,
        day: NaiveDate,
    ) -> RepoResult<Option<HabitLog>> {
        let mut stmt = self.conn.prepare(&format!(
            "{HABIT_LOG_SELECT_SQL}
             WHERE habit_id = ?1
               AND user_id = ?2
               AND completed_date = ?3;"
        ))?;
        let mut rows = stmt.query(params![
            habit_id.to_string(),
            user_id.to_string(),
            day_to_db(day),
        ])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_log_row(row)?));
        }
        Ok(None)
    }

    fn create_log(&self, log: &HabitLog) -> RepoResult<HabitLog> {
        let inserted = self.conn.execute(
            "INSERT INTO habit_logs (
                id,
                habit_id,
                user_id,
                completed_date,
                completed_at
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                log.id.to_string(),
                log.habit_id.to_string(),
                log.user_id.to_string(),
                day_to_db(log.completed_date),
                to_millis(log.completed_at),
            ],
        );

        match inserted {
            Ok(_) => Ok(log.clone()),
            Err(err) if is_unique_violation(&err) => Err(RepoError::Conflict(format!(
                "habit {} already has a log for {}",
                log.habit_id,
                day_to_db(log.completed_date)
            ))),
            Err(err) => Err(err.into()),
        }
    }

    fn list_logs(&self, habit_id: HabitId) -> RepoResult<Vec<HabitLog>> {
        let mut stmt = self.conn.prepare(&format!(
            "{HABIT_LOG_SELECT_SQL}
             WHERE habit_id = ?1
             ORDER BY completed_date DESC;"
        ))?;
        let mut rows = stmt.query([habit_id.to_string()])?;
        let mut logs = Vec::new();
        while let Some(row) = rows.next()? {
            logs.push(parse_log_row(row)?);
        }
        Ok(logs)
    }
}

fn load_habit(conn: &Connection, id: HabitId) -> RepoResult<Option<Habit>> {
    let mut stmt = conn.prepare(&format!("{HABIT_SELECT_SQL} WHERE id = ?1;"))?;
    let mut rows = stmt.query([id.to_string()])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_habit_row(row)?));
    }
    Ok(None)
}

fn parse_habit_row(row: &Row<'_>) -> RepoResult<Habit> {
    let habit = Habit {
        id: parse_uuid(&row.get::<_, String>("id")?, "habits.id")?,
        user_id: parse_uuid(&row.get::<_, String>("user_id")?, "habits.user_id")?,
        name: row.get("name")?,
        description: row.get("description")?,
        target_frequency: row.get("target_frequency")?,
        current_streak: row.get("current_streak")?,
        best_streak: row.get("best_streak")?,
        color: row.get("color")?,
        created_at: from_millis(row.get("created_at")?, "habits.created_at")?,
        is_active: int_to_bool(row.get("is_active")?, "habits.is_active")?,
    };
    habit.validate()?;
    Ok(habit)
}

fn parse_log_row(row: &Row<'_>) -> RepoResult<HabitLog> {
    Ok(HabitLog {
        id: parse_uuid(&row.get::<_, String>("id")?, "habit_logs.id")?,
        habit_id: parse_uuid(&row.get::<_, String>("habit_id")?, "habit_logs.habit_id")?,
        user_id: parse_uuid(&row.get::<_, String>("user_id")?, "habit_logs.user_id")?,
        completed_date: parse_day(
            &row.get::<_, String>("completed_date")?,
            "habit_logs.completed_date",
        )?,
        completed_at: from_millis(row.get("completed_at")?, "habit_logs.completed_at")?,
    })
}
