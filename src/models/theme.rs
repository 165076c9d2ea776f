use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Represents the 'themes' table in the database.
/// A theme groups the quizzes generated for one broad topic.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Theme {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub active: bool,
}
