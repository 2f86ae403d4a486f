//! Task repository contract and SQLite implementation.

use super::{
    bool_to_int, ensure_connection_ready, from_millis, from_optional_millis, int_to_bool,
    parse_uuid, to_millis, RepoError, RepoResult, SortOrder,
};
use crate::model::patch::TaskPatch;
use crate::model::task::{Task, TaskId, TaskPriority, TaskStatus};
use crate::model::user::UserId;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const TASK_SELECT_SQL: &str = "SELECT
    id,
    user_id,
    title,
    description,
    priority,
    status,
    due_date,
    category,
    created_at,
    completed_at,
    is_recurring
FROM tasks";

/// Filter/order/limit options for listing one user's tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListQuery {
    pub user_id: UserId,
    pub status: Option<TaskStatus>,
    pub order: SortOrder,
    pub limit: Option<u32>,
}

impl TaskListQuery {
    /// All tasks of `user_id`, newest first, unbounded.
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

/// Repository interface for the tasks collection.
pub trait TaskRepository {
    /// Inserts a task and returns the stored record.
    fn create_task(&self, task: &Task) -> RepoResult<Task>;
    /// Applies a partial update; the merged record must stay valid.
    fn update_task(&self, id: TaskId, patch: &TaskPatch) -> RepoResult<()>;
    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>>;
    fn list_tasks(&self, query: &TaskListQuery) -> RepoResult<Vec<Task>>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create_task(&self, task: &Task) -> RepoResult<Task> {
        task.validate()?;

        self.conn.execute(
            "INSERT INTO tasks (
                id,
                user_id,
                title,
                description,
                priority,
                status,
                due_date,
                category,
                created_at,
                completed_at,
                is_recurring
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11);",
            params![
                task.id.to_string(),
                task.user_id.to_string(),
                task.title.as_str(),
                task.description.as_deref(),
                task.priority.as_str(),
                task.status.as_str(),
                task.due_date.map(to_millis),
                task.category.as_deref(),
                to_millis(task.created_at),
                task.completed_at.map(to_millis),
                bool_to_int(task.is_recurring),
            ],
        )?;

        Ok(task.clone())
    }

    fn update_task(&self, id: TaskId, patch: &TaskPatch) -> RepoResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        let mut task = load_task(&tx, id)?.ok_or(RepoError::NotFound {
            collection: "task",
            id,
        })?;
        patch.apply_to(&mut task);
        task.validate()?;

        tx.execute(
            "UPDATE tasks
             SET
                status = ?2,
                completed_at = ?3
             WHERE id = ?1;",
            params![
                id.to_string(),
                task.status.as_str(),
                task.completed_at.map(to_millis),
            ],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        load_task(self.conn, id)
    }

    fn list_tasks(&self, query: &TaskListQuery) -> RepoResult<Vec<Task>> {
        let mut sql = format!("{TASK_SELECT_SQL} WHERE user_id = ?");
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
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }
        Ok(tasks)
    }
}

fn load_task(conn: &Connection, id: TaskId) -> RepoResult<Option<Task>> {
    let mut stmt = conn.prepare(&format!("{TASK_SELECT_SQL} WHERE id = ?1;"))?;
    let mut rows = stmt.query([id.to_string()])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_task_row(row)?));
    }
    Ok(None)
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let priority_text: String = row.get("priority")?;
    let priority = TaskPriority::parse(&priority_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid priority `{priority_text}` in tasks.priority"))
    })?;

    let status_text: String = row.get("status")?;
    let status = TaskStatus::parse(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid status `{status_text}` in tasks.status"))
    })?;

    let task = Task {
        id: parse_uuid(&row.get::<_, String>("id")?, "tasks.id")?,
        user_id: parse_uuid(&row.get::<_, String>("user_id")?, "tasks.user_id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        priority,
        status,
        due_date: from_optional_millis(row.get("due_date")?, "tasks.due_date")?,
        category: row.get("category")?,
        created_at: from_millis(row.get("created_at")?, "tasks.created_at")?,
        completed_at: from_optional_millis(row.get("completed_at")?, "tasks.completed_at")?,
        is_recurring: int_to_bool(row.get("is_recurring")?, "tasks.is_recurring")?,
    };
    task.validate()?;
    Ok(task)
}
