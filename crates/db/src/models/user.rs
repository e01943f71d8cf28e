//! User account model and DTOs.

use chrono::{DateTime, Utc};
use farmlog_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A user row from the `users` table.
///
/// The password hash never leaves the server.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_active: bool,
    pub auth_level: i32,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Admin accounts may act on records of any owner.
    pub fn is_admin(&self) -> bool {
        self.auth_level >= 2
    }
}

/// DTO for creating a new user (admin surface).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub password: String,
}
