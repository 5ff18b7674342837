use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Worry {
    pub id: i32,
    pub content: String,
    pub nickname: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Cheer {
    pub id: i32,
    pub worry_id: i32,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// A worry joined with its derived cheer count. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CheeredWorry {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub worry: Worry,
    pub cheer_count: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_worries: i64,
    pub total_cheers: i64,
}

/// Validated input for a new worry.
#[derive(Debug, Clone)]
pub struct NewWorry {
    pub content: String,
    pub nickname: String,
}

/// Validated input for a new cheer.
#[derive(Debug, Clone)]
pub struct NewCheer {
    pub worry_id: i32,
    pub content: String,
}
