//! User identity records.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque owner identifier attached to every record.
pub type UserId = Uuid;

/// Signed-in user profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub display_name: Option<String>,
}

impl User {
    /// Creates a user profile with a generated id.
    pub fn new(email: impl Into<String>, display_name: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            display_name,
        }
    }

    /// Name shown in greetings; falls back to the email local part.
    pub fn greeting_name(&self) -> &str {
        match self.display_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => self.email.split('@').next().unwrap_or(self.email.as_str()),
        }
    }
}
