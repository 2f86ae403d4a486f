//! User profile repository used by the local auth provider.

use super::{ensure_connection_ready, is_unique_violation, parse_uuid, RepoError, RepoResult};
use crate::model::user::{User, UserId};
use crate::model::ensure_not_blank;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};

pub trait UserRepository {
    fn create_user(&self, user: &User) -> RepoResult<User>;
    fn get_user(&self, id: UserId) -> RepoResult<Option<User>>;
    fn find_user_by_email(&self, email: &str) -> RepoResult<Option<User>>;
    /// Records `user_id` as the signed-in user, replacing any prior session.
    fn save_session(&self, user_id: UserId) -> RepoResult<()>;
    fn session_user(&self) -> RepoResult<Option<User>>;
    fn clear_session(&self) -> RepoResult<()>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create_user(&self, user: &User) -> RepoResult<User> {
        ensure_not_blank("email", &user.email)?;

        let inserted = self.conn.execute(
            "INSERT INTO users (id, email, display_name, created_at)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                user.id.to_string(),
                user.email.as_str(),
                user.display_name.as_deref(),
                Utc::now().timestamp_millis(),
            ],
        );

        match inserted {
            Ok(_) => Ok(user.clone()),
            Err(err) if is_unique_violation(&err) => Err(RepoError::Conflict(format!(
                "user email already registered: {}",
                user.email
            ))),
            Err(err) => Err(err.into()),
        }
    }

    fn get_user(&self, id: UserId) -> RepoResult<Option<User>> {
        self.conn
            .query_row(
                "SELECT id, email, display_name FROM users WHERE id = ?1;",
                [id.to_string()],
                read_user_columns,
            )
            .optional()?
            .map(into_user)
            .transpose()
    }

    fn find_user_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        self.conn
            .query_row(
                "SELECT id, email, display_name FROM users WHERE email = ?1;",
                [email],
                read_user_columns,
            )
            .optional()?
            .map(into_user)
            .transpose()
    }

    fn save_session(&self, user_id: UserId) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO session (singleton, user_id, signed_in_at)
             VALUES (1, ?1, ?2)
             ON CONFLICT(singleton) DO UPDATE SET
                user_id = excluded.user_id,
                signed_in_at = excluded.signed_in_at;",
            params![user_id.to_string(), Utc::now().timestamp_millis()],
        )?;
        Ok(())
    }

    fn session_user(&self) -> RepoResult<Option<User>> {
        self.conn
            .query_row(
                "SELECT users.id, users.email, users.display_name
                 FROM session
                 JOIN users ON users.id = session.user_id
                 WHERE session.singleton = 1;",
                [],
                read_user_columns,
            )
            .optional()?
            .map(into_user)
            .transpose()
    }

    fn clear_session(&self) -> RepoResult<()> {
        self.conn.execute("DELETE FROM session;", [])?;
        Ok(())
    }
}

type UserColumns = (String, String, Option<String>);

fn read_user_columns(row: &Row<'_>) -> rusqlite::Result<UserColumns> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?))
}

fn into_user((id, email, display_name): UserColumns) -> RepoResult<User> {
    Ok(User {
        id: parse_uuid(&id, "users.id")?,
        email,
        display_name,
    })
}
