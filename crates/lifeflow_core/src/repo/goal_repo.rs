//! Goal repository contract and SQLite implementation.

use super::{
    ensure_connection_ready, from_millis, from_optional_millis, parse_uuid, to_millis, RepoError,
    RepoResult, SortOrder,
};
use crate::model::goal::{Goal, GoalId, GoalStatus};
use crate::model::patch::GoalPatch;
use crate::model::user::UserId;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const GOAL_SELECT_SQL: &str = "SELECT
    id,
    user_id,
    title,
    description,
    target_date,
    progress,
    status,
    category,
    created_at,
    completed_at
FROM goals";

/// Filter/order/limit options for listing one user's goals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalListQuery {
    pub user_id: UserId,
    pub status: Option<GoalStatus>,
    pub order: SortOrder,
    pub limit: Option<u32>,
}

impl GoalListQuery {
    pub fn for_user(user_id: UserId) -> Self {
        Self {
            user_id,
            status: None,
            order: SortOrder::NewestFirst,
            limit: None,
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Repository interface for the goals collection.
pub trait GoalRepository {
    fn create_goal(&self, goal: &Goal) -> RepoResult<Goal>;
    fn update_goal(&self, id: GoalId, patch: &GoalPatch) -> RepoResult<()>;
    fn get_goal(&self, id: GoalId) -> RepoResult<Option<Goal>>;
    fn list_goals(&self, query: &GoalListQuery) -> RepoResult<Vec<Goal>>;
}

/// SQLite-backed goal repository.
pub struct SqliteGoalRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteGoalRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl GoalRepository for SqliteGoalRepository<'_> {
    fn create_goal(&self, goal: &Goal) -> RepoResult<Goal> {
        goal.validate()?;

        self.conn.execute(
            "INSERT INTO goals (
                id,
                user_id,
                title,
                description,
                target_date,
                progress,
                status,
                category,
                created_at,
                completed_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10);",
            params![
                goal.id.to_string(),
                goal.user_id.to_string(),
                goal.title.as_str(),
                goal.description.as_deref(),
                goal.target_date.map(to_millis),
                goal.progress,
                goal.status.as_str(),
                goal.category.as_deref(),
                to_millis(goal.created_at),
                goal.completed_at.map(to_millis),
            ],
        )?;

        Ok(goal.clone())
    }

    fn update_goal(&self, id: GoalId, patch: &GoalPatch) -> RepoResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        let mut goal = load_goal(&tx, id)?.ok_or(RepoError::NotFound {
            collection: "goal",
            id,
        })?;
        patch.apply_to(&mut goal);
        goal.validate()?;

        tx.execute(
            "UPDATE goals
             SET
                progress = ?2,
                status = ?3,
                completed_at = ?4
             WHERE id = ?1;",
            params![
                id.to_string(),
                goal.progress,
                goal.status.as_str(),
                goal.completed_at.map(to_millis),
            ],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn get_goal(&self, id: GoalId) -> RepoResult<Option<Goal>> {
        load_goal(self.conn, id)
    }

    fn list_goals(&self, query: &GoalListQuery) -> RepoResult<Vec<Goal>> {
        let mut sql = format!("{GOAL_SELECT_SQL} WHERE user_id = ?");
        let mut bind_values = vec![Value::Text(query.user_id.to_string())];

        if let Some(status) = query.status {
            sql.push_str(" AND status = ?");
            bind_values.push(Value::Text(status.as_str().to_string()));
        }

        sql.push_str(query.order.order_by_sql());

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut goals = Vec::new();
        while let Some(row) = rows.next()? {
            goals.push(parse_goal_row(row)?);
        }
        Ok(goals)
    }
}

fn load_goal(conn: &Connection, id: GoalId) -> RepoResult<Option<Goal>> {
    let mut stmt = conn.prepare(&format!("{GOAL_SELECT_SQL} WHERE id = ?1;"))?;
    let mut rows = stmt.query([id.to_string()])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_goal_row(row)?));
    }
    Ok(None)
}

fn parse_goal_row(row: &Row<'_>) -> RepoResult<Goal> {
    let status_text: String = row.get("status")?;
    let status = GoalStatus::parse(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid status `{status_text}` in goals.status"))
    })?;

    let goal = Goal {
        id: parse_uuid(&row.get::<_, String>("id")?, "goals.id")?,
        user_id: parse_uuid(&row.get::<_, String>("user_id")?, "goals.user_id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        target_date: from_optional_millis(row.get("target_date")?, "goals.target_date")?,
        progress: row.get("progress")?,
        status,
        category: row.get("category")?,
        created_at: from_millis(row.get("created_at")?, "goals.created_at")?,
        completed_at: from_optional_millis(row.get("completed_at")?, "goals.completed_at")?,
    };
    goal.validate()?;
    Ok(goal)
}
