// db/notificationdb.rs
use async_trait::async_trait;
use sqlx::Error;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::notificationmodel::Notification;

#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn store_notification(
        &self,
        user_id: Option<Uuid>,
        kind: &str,
        job_id: Option<Uuid>,
        payload: Option<serde_json::Value>,
        message: String,
    ) -> Result<(), Error>;

    async fn get_notifications_for_user(
        &self,
        user_id: Uuid,
        limit: usize,
    ) -> Result<Vec<Notification>, Error>;
}

#[async_trait]
impl NotificationStore for DBClient {
    async fn store_notification(
        &self,
        user_id: Option<Uuid>,
        kind: &str,
        job_id: Option<Uuid>,
        payload: Option<serde_json::Value>,
        message: String,
    ) -> Result<(), Error> {
        sqlx::query(
            r#"
            INSERT INTO notifications (user_id, kind, job_id, payload, message)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(user_id)
        .bind(kind)
        .bind(job_id)
        .bind(payload)
        .bind(message)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_notifications_for_user(
        &self,
        user_id: Uuid,
        limit: usize,
    ) -> Result<Vec<Notification>, Error> {
        sqlx::query_as::<_, Notification>(
            r#"
            SELECT id, user_id, kind, job_id, payload, message, created_at
            FROM notifications
            WHERE user_id = $1 OR user_id IS NULL
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
    }
}
