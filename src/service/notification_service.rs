// services/notification_service.rs
use std::sync::Arc;

use uuid::Uuid;

use crate::{
    db::notificationdb::NotificationStore,
    models::{jobmodel::Job, techmodel::TechnicianProfile},
    service::error::ServiceError,
};

/// Persists notification rows and logs them. Push/email delivery is handled
/// by a separate channel consuming the notifications table.
#[derive(Clone)]
pub struct NotificationService {
    store: Arc<dyn NotificationStore>,
}

impl NotificationService {
    pub fn new(store: Arc<dyn NotificationStore>) -> Self {
        Self { store }
    }

    pub async fn notify_new_job(&self, job: &Job) -> Result<(), ServiceError> {
        tracing::info!(
            "New job posted: {} in {} for {} category",
            job.title,
            job.location_state,
            job.category.to_str()
        );

        self.store
            .store_notification(
                None, // Broadcast
                "new_job",
                Some(job.id),
                Some(serde_json::json!({
                    "job_title": job.title,
                    "location": job.location_state,
                    "category": job.category.to_str(),
                    "price": job.price,
                })),
                format!("New job available: {}", job.title),
            )
            .await
            .map_err(ServiceError::Database)
    }

    /// Offer placed for a technician; they have until `expires_at` to respond.
    pub async fn notify_offer_made(
        &self,
        job: &Job,
        technician: &TechnicianProfile,
    ) -> Result<(), ServiceError> {
        tracing::info!(
            "Offer made: job {} reserved for technician {}",
            job.id,
            technician.user_id
        );

        self.store
            .store_notification(
                Some(technician.user_id),
                "offer_made",
                Some(job.id),
                Some(serde_json::json!({
                    "job_title": job.title,
                    "expires_at": job.expires_at,
                })),
                format!("New job offer: {}", job.title),
            )
            .await
            .map_err(ServiceError::Database)
    }

    /// No eligible candidate remains for the job.
    pub async fn notify_no_technician_available(&self, job: &Job) -> Result<(), ServiceError> {
        tracing::info!("No technician available for job {}", job.id);

        self.store
            .store_notification(
                Some(job.client_id),
                "no_technician_available",
                Some(job.id),
                None,
                format!(
                    "No technician is available yet for \"{}\". We will keep looking.",
                    job.title
                ),
            )
            .await
            .map_err(ServiceError::Database)
    }

    pub async fn notify_job_accepted(&self, job: &Job, tech_id: Uuid) -> Result<(), ServiceError> {
        tracing::info!("Technician {} accepted job {}", tech_id, job.id);

        self.store
            .store_notification(
                Some(job.client_id),
                "job_accepted",
                Some(job.id),
                Some(serde_json::json!({
                    "technician_id": tech_id,
                    "accepted_count": job.accepted_count(),
                    "workers_needed": job.workers_needed,
                })),
                format!("A technician accepted your job: {}", job.title),
            )
            .await
            .map_err(ServiceError::Database)
    }

    pub async fn notify_offer_declined(
        &self,
        job: &Job,
        tech_id: Uuid,
        timed_out: bool,
    ) -> Result<(), ServiceError> {
        let reason = if timed_out { "timed out" } else { "declined" };
        tracing::info!("Offer for job {} {} by technician {}", job.id, reason, tech_id);

        self.store
            .store_notification(
                Some(job.client_id),
                "offer_declined",
                Some(job.id),
                Some(serde_json::json!({
                    "technician_id": tech_id,
                    "timed_out": timed_out,
                })),
                format!("Still matching your job \"{}\" with a technician", job.title),
            )
            .await
            .map_err(ServiceError::Database)
    }
}
