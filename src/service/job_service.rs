// services/job_service.rs
use std::sync::Arc;

use uuid::Uuid;

use crate::{
    db::jobdb::JobStore,
    dtos::jobdtos::BookJobDto,
    models::jobmodel::Job,
    service::{
        assignment_service::{AssignmentOutcome, AssignmentService},
        error::ServiceError,
        notification_service::NotificationService,
    },
};

/// Booking and job lifecycle operations outside the offer/response loop.
#[derive(Clone)]
pub struct JobService {
    store: Arc<dyn JobStore>,
    assignment: Arc<AssignmentService>,
    notifications: Arc<NotificationService>,
}

impl JobService {
    pub fn new(
        store: Arc<dyn JobStore>,
        assignment: Arc<AssignmentService>,
        notifications: Arc<NotificationService>,
    ) -> Self {
        Self {
            store,
            assignment,
            notifications,
        }
    }

    /// Create the job and run the first assignment round synchronously so the
    /// caller learns whether an offer went out or no technician is available
    /// yet. An empty region is a normal outcome, not a failure.
    pub async fn book_job(
        &self,
        client_id: Uuid,
        data: BookJobDto,
    ) -> Result<AssignmentOutcome, ServiceError> {
        let job = self
            .store
            .create_job(
                client_id,
                data.category,
                data.title,
                data.description,
                data.location_state,
                data.location_city,
                data.location_address,
                data.latitude,
                data.longitude,
                data.price,
                data.workers_needed.unwrap_or(1),
            )
            .await?;

        if let Err(err) = self.notifications.notify_new_job(&job).await {
            tracing::warn!("failed to record new-job notification: {}", err);
        }

        self.assignment.dispatch_round(job.id).await
    }

    pub async fn get_job(&self, job_id: Uuid) -> Result<Job, ServiceError> {
        self.store
            .get_job_by_id(job_id)
            .await?
            .ok_or(ServiceError::JobNotFound(job_id))
    }

    pub async fn get_client_jobs(&self, client_id: Uuid) -> Result<Vec<Job>, ServiceError> {
        Ok(self.store.get_jobs_by_client(client_id).await?)
    }

    pub async fn get_open_offers(&self, tech_id: Uuid) -> Result<Vec<Job>, ServiceError> {
        Ok(self.store.get_offers_for_tech(tech_id).await?)
    }

    /// Manual cancellation by the requesting client. Conditional in the
    /// store, so an already-accepted job cannot be cancelled from under its
    /// technicians.
    pub async fn cancel_job(&self, job_id: Uuid, client_id: Uuid) -> Result<Job, ServiceError> {
        let job = self
            .store
            .get_job_by_id(job_id)
            .await?
            .ok_or(ServiceError::JobNotFound(job_id))?;

        if job.client_id != client_id {
            return Err(ServiceError::UnauthorizedJobAccess(client_id, job_id));
        }

        self.store
            .cancel_job(job_id, client_id)
            .await?
            .ok_or(ServiceError::InvalidJobStatus(job_id, job.status))
    }

    /// Technician acknowledges having seen the offer.
    pub async fn mark_offer_seen(&self, job_id: Uuid, tech_id: Uuid) -> Result<Job, ServiceError> {
        let job = self
            .store
            .get_job_by_id(job_id)
            .await?
            .ok_or(ServiceError::JobNotFound(job_id))?;

        if !job.notified_techs.contains(&tech_id) {
            return Err(ServiceError::UnauthorizedJobAccess(tech_id, job_id));
        }

        self.store
            .mark_seen(job_id, tech_id)
            .await?
            .ok_or(ServiceError::JobNotFound(job_id))
    }
}
