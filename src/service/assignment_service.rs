// services/assignment_service.rs
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::{
    db::jobdb::JobStore,
    models::{jobmodel::Job, techmodel::TechnicianProfile},
    service::{
        error::ServiceError, matching_service::MatchingService,
        matching_service::TechCandidate, notification_service::NotificationService,
    },
};

/// Result of one assignment round. Exhaustion is an expected outcome, never
/// an error: a job without candidates simply waits in `pending_assignment`.
#[derive(Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AssignmentOutcome {
    Offered {
        job: Job,
        technician: TechnicianProfile,
        distance_m: f64,
    },
    Exhausted {
        job: Job,
    },
}

impl AssignmentOutcome {
    pub fn job(&self) -> &Job {
        match self {
            AssignmentOutcome::Offered { job, .. } => job,
            AssignmentOutcome::Exhausted { job } => job,
        }
    }
}

/// Walks a ranked candidate list, reserves the job for the first eligible
/// technician via a conditional store update, and arms the reservation-window
/// timer. Cloneable so expiry timers can carry their own handle into a task.
#[derive(Clone)]
pub struct AssignmentService {
    store: Arc<dyn JobStore>,
    matching: Arc<MatchingService>,
    notifications: Arc<NotificationService>,
    reservation_window: Duration,
}

impl AssignmentService {
    pub fn new(
        store: Arc<dyn JobStore>,
        matching: Arc<MatchingService>,
        notifications: Arc<NotificationService>,
        reservation_window: Duration,
    ) -> Self {
        Self {
            store,
            matching,
            notifications,
            reservation_window,
        }
    }

    pub fn reservation_window(&self) -> Duration {
        self.reservation_window
    }

    /// Rank a fresh candidate pool for the job and run one assignment round.
    pub async fn dispatch_round(&self, job_id: Uuid) -> Result<AssignmentOutcome, ServiceError> {
        let job = self
            .store
            .get_job_by_id(job_id)
            .await?
            .ok_or(ServiceError::JobNotFound(job_id))?;

        if !job.status.is_reservable() {
            return Ok(AssignmentOutcome::Exhausted { job });
        }

        let candidates = self.matching.rank_candidates(&job).await?;
        self.attempt_assign(job_id, &candidates, 0).await
    }

    /// One pass over `candidates[start_index..]`. The exclusion sets are
    /// re-read from the store before every reservation attempt because a
    /// concurrent round may have changed them since the list was ranked; a
    /// reservation that affects zero rows lost a race and simply advances to
    /// the next index.
    pub async fn attempt_assign(
        &self,
        job_id: Uuid,
        candidates: &[TechCandidate],
        start_index: usize,
    ) -> Result<AssignmentOutcome, ServiceError> {
        let mut index = start_index;

        loop {
            let job = self
                .store
                .get_job_by_id(job_id)
                .await?
                .ok_or(ServiceError::JobNotFound(job_id))?;

            if !job.status.is_reservable() {
                // Cancelled, already holding an offer, or filled concurrently.
                return Ok(AssignmentOutcome::Exhausted { job });
            }

            while index < candidates.len() && job.is_excluded(candidates[index].profile.user_id) {
                index += 1;
            }

            if index >= candidates.len() {
                return self.give_up(job).await;
            }

            let candidate = &candidates[index];
            let expires_at = Utc::now()
                + chrono::Duration::from_std(self.reservation_window)
                    .unwrap_or_else(|_| chrono::Duration::seconds(180));

            match self
                .store
                .reserve_if_available(job_id, candidate.profile.user_id, expires_at)
                .await?
            {
                Some(reserved) => {
                    if let Err(err) = self
                        .notifications
                        .notify_offer_made(&reserved, &candidate.profile)
                        .await
                    {
                        tracing::warn!("failed to record offer notification: {}", err);
                    }

                    self.arm_expiry(job_id, candidate.profile.user_id);

                    return Ok(AssignmentOutcome::Offered {
                        job: reserved,
                        technician: candidate.profile.clone(),
                        distance_m: candidate.distance_m,
                    });
                }
                None => {
                    // Lost the reservation race; try the next candidate.
                    index += 1;
                }
            }
        }
    }

    /// Offer expired without a response: record the technician as declined
    /// and re-enter the engine on a freshly ranked pool. The conditional
    /// release makes a late or duplicate firing a no-op once the technician
    /// responded or the job progressed.
    pub async fn expire_offer(&self, job_id: Uuid, tech_id: Uuid) -> Result<(), ServiceError> {
        match self.store.release_offer(job_id, tech_id).await? {
            Some(job) => {
                tracing::info!(
                    "offer on job {} for technician {} expired, re-dispatching",
                    job_id,
                    tech_id
                );

                if let Err(err) = self.notifications.notify_offer_declined(&job, tech_id, true).await
                {
                    tracing::warn!("failed to record expiry notification: {}", err);
                }

                self.dispatch_round(job_id).await?;
                Ok(())
            }
            None => Ok(()),
        }
    }

    /// No eligible candidate remains. Parks the job (conditionally, so a
    /// concurrent acceptance or cancellation is not overwritten) and fires
    /// the exhaustion hook.
    async fn give_up(&self, job: Job) -> Result<AssignmentOutcome, ServiceError> {
        let job = self
            .store
            .mark_pending_assignment(job.id)
            .await?
            .unwrap_or(job);

        if let Err(err) = self.notifications.notify_no_technician_available(&job).await {
            tracing::warn!("failed to record exhaustion notification: {}", err);
        }

        Ok(AssignmentOutcome::Exhausted { job })
    }

    /// Arm the reservation-window timer for an outstanding offer. There is no
    /// cancellation handle: the task always fires and `expire_offer`
    /// re-validates state before acting.
    fn arm_expiry(&self, job_id: Uuid, tech_id: Uuid) {
        let engine = self.clone();

        tokio::spawn(async move {
            tokio::time::sleep(engine.reservation_window).await;

            if let Err(err) = engine.expire_offer(job_id, tech_id).await {
                tracing::error!(
                    "offer expiry handling failed for job {}: {}",
                    job_id,
                    err
                );
            }
        });
    }
}
