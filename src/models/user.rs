// src/models/user.rs

use serde::Serialize;
use sqlx::FromRow;

/// Represents the 'users' table in the database.
///
/// Created on first access from the `x-user-email` key and never modified afterwards.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,

    /// Trimmed, lower-cased email used as the user's opaque key.
    pub email: String,

    pub created_at: chrono::DateTime<chrono::Utc>,
}
