use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Option<Uuid>, // NULL means broadcast
    pub kind: String,
    pub job_id: Option<Uuid>,
    pub payload: Option<serde_json::Value>,
    pub message: String,
    pub created_at: Option<DateTime<Utc>>,
}
