// services/acceptance_service.rs
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    db::jobdb::JobStore,
    models::jobmodel::{Job, JobStatus},
    service::{
        assignment_service::AssignmentService, error::ServiceError,
        notification_service::NotificationService,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OfferAction {
    Accept,
    Decline,
}

#[derive(Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RespondOutcome {
    /// All required slots are filled; the job is final.
    Accepted { job: Job },
    /// Acceptance recorded but slots remain; a top-up round has run.
    PartiallyStaffed { job: Job },
    Declined { job: Job },
}

impl RespondOutcome {
    pub fn job(&self) -> &Job {
        match self {
            RespondOutcome::Accepted { job } => job,
            RespondOutcome::PartiallyStaffed { job } => job,
            RespondOutcome::Declined { job } => job,
        }
    }
}

/// Processes technician responses to an outstanding offer and drives the
/// follow-up assignment rounds.
#[derive(Clone)]
pub struct AcceptanceService {
    store: Arc<dyn JobStore>,
    assignment: Arc<AssignmentService>,
    notifications: Arc<NotificationService>,
}

impl AcceptanceService {
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

    pub async fn respond(
        &self,
        job_id: Uuid,
        tech_id: Uuid,
        action: OfferAction,
    ) -> Result<RespondOutcome, ServiceError> {
        let job = self
            .store
            .get_job_by_id(job_id)
            .await?
            .ok_or(ServiceError::JobNotFound(job_id))?;

        match action {
            OfferAction::Accept => self.accept(job, tech_id).await,
            OfferAction::Decline => self.decline(job, tech_id).await,
        }
    }

    async fn accept(&self, job: Job, tech_id: Uuid) -> Result<RespondOutcome, ServiceError> {
        // A repeated accept is a no-op, whatever state the job reached since.
        if job.assigned_tech_ids.contains(&tech_id) {
            return Ok(RespondOutcome::Accepted { job });
        }

        let authorized = match job.status {
            JobStatus::PendingAccept => job.assigned_tech_id == Some(tech_id),
            JobStatus::Partial => {
                job.notified_techs.contains(&tech_id) && !job.declined_techs.contains(&tech_id)
            }
            _ => false,
        };

        if !authorized {
            return Err(ServiceError::NotCurrentOfferee(tech_id, job.id));
        }

        // The conditional update settles any race with the expiry timer: if
        // the offer was released in the meantime the acceptance is rejected.
        let updated = self
            .store
            .record_acceptance(job.id, tech_id)
            .await?
            .ok_or(ServiceError::NotCurrentOfferee(tech_id, job.id))?;

        if let Err(err) = self.notifications.notify_job_accepted(&updated, tech_id).await {
            tracing::warn!("failed to record acceptance notification: {}", err);
        }

        if updated.is_filled() {
            let job = self
                .store
                .finalize_job(updated.id)
                .await?
                .unwrap_or(updated);

            return Ok(RespondOutcome::Accepted { job });
        }

        // Slots remain: drop the consumed offer, mark the job partial and run
        // a top-up round over a freshly ranked pool (the acceptance itself is
        // already persisted either way).
        let partial = self
            .store
            .clear_offer_after_acceptance(updated.id, tech_id)
            .await?
            .unwrap_or(updated);

        let outcome = self.assignment.dispatch_round(partial.id).await?;

        Ok(RespondOutcome::PartiallyStaffed {
            job: outcome.job().clone(),
        })
    }

    async fn decline(&self, job: Job, tech_id: Uuid) -> Result<RespondOutcome, ServiceError> {
        // A repeated decline is a no-op.
        if job.declined_techs.contains(&tech_id) {
            return Ok(RespondOutcome::Declined { job });
        }

        let holds_offer =
            job.status == JobStatus::PendingAccept && job.assigned_tech_id == Some(tech_id);

        if holds_offer {
            return match self.store.release_offer(job.id, tech_id).await? {
                Some(released) => {
                    if let Err(err) = self
                        .notifications
                        .notify_offer_declined(&released, tech_id, false)
                        .await
                    {
                        tracing::warn!("failed to record decline notification: {}", err);
                    }

                    let outcome = self.assignment.dispatch_round(released.id).await?;

                    Ok(RespondOutcome::Declined {
                        job: outcome.job().clone(),
                    })
                }
                None => {
                    // The expiry timer beat us to it; exactly one decline
                    // transition is recorded.
                    let job = self
                        .store
                        .get_job_by_id(job.id)
                        .await?
                        .ok_or(ServiceError::JobNotFound(job.id))?;

                    if job.declined_techs.contains(&tech_id) {
                        Ok(RespondOutcome::Declined { job })
                    } else {
                        Err(ServiceError::NotCurrentOfferee(tech_id, job.id))
                    }
                }
            };
        }

        // A previously notified technician may still bow out of a partial
        // job; recorded so they are never offered this job again.
        if job.status == JobStatus::Partial
            && job.notified_techs.contains(&tech_id)
            && !job.assigned_tech_ids.contains(&tech_id)
        {
            self.store.record_decline(job.id, tech_id).await?;

            let job = self
                .store
                .get_job_by_id(job.id)
                .await?
                .ok_or(ServiceError::JobNotFound(job.id))?;

            return Ok(RespondOutcome::Declined { job });
        }

        Err(ServiceError::NotCurrentOfferee(tech_id, job.id))
    }
}
