// db/jobdb.rs
//
// The jobs table is the single shared mutable resource of the dispatch core.
// Every assignment-related mutation below is a conditional UPDATE keyed on the
// current status (and, where an offer is involved, the offeree identity), so
// concurrent reservation attempts, technician responses and expiry timers
// resolve through row-level compare-and-swap instead of read-then-write.
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Error;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::{jobmodel::*, techmodel::TechCategory};

#[async_trait]
pub trait JobStore: Send + Sync {
    async fn create_job(
        &self,
        client_id: Uuid,
        category: TechCategory,
        title: String,
        description: String,
        location_state: String,
        location_city: String,
        location_address: String,
        latitude: Option<f64>,
        longitude: Option<f64>,
        price: f64,
        workers_needed: i32,
    ) -> Result<Job, Error>;

    async fn get_job_by_id(&self, job_id: Uuid) -> Result<Option<Job>, Error>;

    async fn get_jobs_by_client(&self, client_id: Uuid) -> Result<Vec<Job>, Error>;

    async fn get_jobs(&self, page: u32, limit: usize) -> Result<Vec<Job>, Error>;

    async fn get_offers_for_tech(&self, tech_id: Uuid) -> Result<Vec<Job>, Error>;

    /// Atomic conditional reservation. Succeeds only while the job is still in
    /// a reservable state; `None` means the reservation lost a race (or the
    /// job was cancelled/accepted in the meantime) and the caller should move
    /// on to the next candidate.
    async fn reserve_if_available(
        &self,
        job_id: Uuid,
        tech_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<Option<Job>, Error>;

    /// Decline transition for the outstanding offer: clears the offer fields,
    /// appends the technician to `declined_techs` and moves the job back to
    /// `pending_assignment`. Conditional on the technician still holding the
    /// offer and not having been recorded as accepted, so a late expiry timer
    /// firing after an acceptance (or after a concurrent decline) is a no-op.
    async fn release_offer(&self, job_id: Uuid, tech_id: Uuid) -> Result<Option<Job>, Error>;

    /// Idempotent append to `declined_techs` with no status transition. Used
    /// when a previously notified technician declines a job that no longer
    /// holds an offer for them (e.g. a `partial` job).
    async fn record_decline(&self, job_id: Uuid, tech_id: Uuid) -> Result<(), Error>;

    /// Idempotent append to `assigned_tech_ids`, guarded against declined
    /// technicians and already-filled jobs. `None` means the technician no
    /// longer qualifies (offer revoked, job cancelled, or already filled).
    async fn record_acceptance(&self, job_id: Uuid, tech_id: Uuid) -> Result<Option<Job>, Error>;

    /// After an acceptance that leaves slots open: drop the outstanding offer
    /// fields and mark the job `partial` so a top-up round can reserve again.
    async fn clear_offer_after_acceptance(
        &self,
        job_id: Uuid,
        tech_id: Uuid,
    ) -> Result<Option<Job>, Error>;

    /// Terminal accepted state, only once enough technicians accepted.
    async fn finalize_job(&self, job_id: Uuid) -> Result<Option<Job>, Error>;

    /// Candidate pool exhausted: park the job until an external trigger
    /// (new booking, decline, timeout) re-enters the engine.
    async fn mark_pending_assignment(&self, job_id: Uuid) -> Result<Option<Job>, Error>;

    async fn mark_seen(&self, job_id: Uuid, tech_id: Uuid) -> Result<Option<Job>, Error>;

    async fn cancel_job(&self, job_id: Uuid, client_id: Uuid) -> Result<Option<Job>, Error>;

    /// Offers whose reservation window passed; consumed by the sweeper that
    /// covers timers lost to a process restart.
    async fn get_expired_offers(&self, now: DateTime<Utc>) -> Result<Vec<Job>, Error>;
}

const JOB_COLUMNS: &str = r#"
    id, client_id, category, title, description,
    location_state, location_city, location_address,
    latitude, longitude, price, workers_needed,
    status, assigned_tech_id, assigned_tech_ids, declined_techs,
    notified_techs, seen_by_techs,
    assigned_at, expires_at, accepted_at, created_at, updated_at
"#;

#[async_trait]
impl JobStore for DBClient {
    async fn create_job(
        &self,
        client_id: Uuid,
        category: TechCategory,
        title: String,
        description: String,
        location_state: String,
        location_city: String,
        location_address: String,
        latitude: Option<f64>,
        longitude: Option<f64>,
        price: f64,
        workers_needed: i32,
    ) -> Result<Job, Error> {
        sqlx::query_as::<_, Job>(&format!(
            r#"
            INSERT INTO jobs
            (client_id, category, title, description, location_state, location_city,
            location_address, latitude, longitude, price, workers_needed)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {JOB_COLUMNS}
            "#
        ))
        .bind(client_id)
        .bind(category)
        .bind(title)
        .bind(description)
        .bind(location_state)
        .bind(location_city)
        .bind(location_address)
        .bind(latitude)
        .bind(longitude)
        .bind(price)
        .bind(workers_needed)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_job_by_id(&self, job_id: Uuid) -> Result<Option<Job>, Error> {
        sqlx::query_as::<_, Job>(&format!(
            r#"
            SELECT {JOB_COLUMNS}
            FROM jobs WHERE id = $1
            "#
        ))
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_jobs_by_client(&self, client_id: Uuid) -> Result<Vec<Job>, Error> {
        sqlx::query_as::<_, Job>(&format!(
            r#"
            SELECT {JOB_COLUMNS}
            FROM jobs
            WHERE client_id = $1
            ORDER BY created_at DESC
            "#
        ))
        .bind(client_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_jobs(&self, page: u32, limit: usize) -> Result<Vec<Job>, Error> {
        let offset = (page.saturating_sub(1) as i64) * limit as i64;

        sqlx::query_as::<_, Job>(&format!(
            r#"
            SELECT {JOB_COLUMNS}
            FROM jobs
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#
        ))
        .bind(limit as i64)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_offers_for_tech(&self, tech_id: Uuid) -> Result<Vec<Job>, Error> {
        sqlx::query_as::<_, Job>(&format!(
            r#"
            SELECT {JOB_COLUMNS}
            FROM jobs
            WHERE status = 'pending_accept'::job_status AND assigned_tech_id = $1
            ORDER BY expires_at ASC
            "#
        ))
        .bind(tech_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn reserve_if_available(
        &self,
        job_id: Uuid,
        tech_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<Option<Job>, Error> {
        sqlx::query_as::<_, Job>(&format!(
            r#"
            UPDATE jobs
            SET status = 'pending_accept'::job_status,
                assigned_tech_id = $2,
                assigned_at = NOW(),
                expires_at = $3,
                notified_techs = CASE WHEN $2 = ANY(notified_techs)
                    THEN notified_techs ELSE array_append(notified_techs, $2) END,
                updated_at = NOW()
            WHERE id = $1
              AND status IN ('created'::job_status, 'pending_assignment'::job_status, 'partial'::job_status)
              AND NOT ($2 = ANY(declined_techs))
              AND NOT ($2 = ANY(assigned_tech_ids))
            RETURNING {JOB_COLUMNS}
            "#
        ))
        .bind(job_id)
        .bind(tech_id)
        .bind(expires_at)
        .fetch_optional(&self.pool)
        .await
    }

    async fn release_offer(&self, job_id: Uuid, tech_id: Uuid) -> Result<Option<Job>, Error> {
        sqlx::query_as::<_, Job>(&format!(
            r#"
            UPDATE jobs
            SET status = 'pending_assignment'::job_status,
                assigned_tech_id = NULL,
                assigned_at = NULL,
                expires_at = NULL,
                declined_techs = CASE WHEN $2 = ANY(declined_techs)
                    THEN declined_techs ELSE array_append(declined_techs, $2) END,
                updated_at = NOW()
            WHERE id = $1
              AND status = 'pending_accept'::job_status
              AND assigned_tech_id = $2
              AND NOT ($2 = ANY(assigned_tech_ids))
            RETURNING {JOB_COLUMNS}
            "#
        ))
        .bind(job_id)
        .bind(tech_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn record_decline(&self, job_id: Uuid, tech_id: Uuid) -> Result<(), Error> {
        sqlx::query(
            r#"
            UPDATE jobs
            SET declined_techs = CASE WHEN $2 = ANY(declined_techs)
                    THEN declined_techs ELSE array_append(declined_techs, $2) END,
                updated_at = NOW()
            WHERE id = $1
              AND NOT ($2 = ANY(assigned_tech_ids))
            "#,
        )
        .bind(job_id)
        .bind(tech_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn record_acceptance(&self, job_id: Uuid, tech_id: Uuid) -> Result<Option<Job>, Error> {
        sqlx::query_as::<_, Job>(&format!(
            r#"
            UPDATE jobs
            SET assigned_tech_ids = CASE WHEN $2 = ANY(assigned_tech_ids)
                    THEN assigned_tech_ids ELSE array_append(assigned_tech_ids, $2) END,
                updated_at = NOW()
            WHERE id = $1
              AND status IN ('pending_accept'::job_status, 'partial'::job_status)
              AND NOT ($2 = ANY(declined_techs))
              AND (assigned_tech_id = $2 OR $2 = ANY(notified_techs))
              AND cardinality(assigned_tech_ids) < workers_needed
            RETURNING {JOB_COLUMNS}
            "#
        ))
        .bind(job_id)
        .bind(tech_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn clear_offer_after_acceptance(
        &self,
        job_id: Uuid,
        tech_id: Uuid,
    ) -> Result<Option<Job>, Error> {
        sqlx::query_as::<_, Job>(&format!(
            r#"
            UPDATE jobs
            SET status = 'partial'::job_status,
                assigned_tech_id = NULL,
                assigned_at = NULL,
                expires_at = NULL,
                updated_at = NOW()
            WHERE id = $1
              AND status = 'pending_accept'::job_status
              AND assigned_tech_id = $2
            RETURNING {JOB_COLUMNS}
            "#
        ))
        .bind(job_id)
        .bind(tech_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn finalize_job(&self, job_id: Uuid) -> Result<Option<Job>, Error> {
        sqlx::query_as::<_, Job>(&format!(
            r#"
            UPDATE jobs
            SET status = 'accepted'::job_status,
                accepted_at = NOW(),
                expires_at = NULL,
                updated_at = NOW()
            WHERE id = $1
              AND status IN ('pending_accept'::job_status, 'partial'::job_status)
              AND cardinality(assigned_tech_ids) >= workers_needed
            RETURNING {JOB_COLUMNS}
            "#
        ))
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn mark_pending_assignment(&self, job_id: Uuid) -> Result<Option<Job>, Error> {
        sqlx::query_as::<_, Job>(&format!(
            r#"
            UPDATE jobs
            SET status = 'pending_assignment'::job_status,
                assigned_tech_id = NULL,
                assigned_at = NULL,
                expires_at = NULL,
                updated_at = NOW()
            WHERE id = $1
              AND status IN ('created'::job_status, 'pending_assignment'::job_status, 'partial'::job_status)
            RETURNING {JOB_COLUMNS}
            "#
        ))
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn mark_seen(&self, job_id: Uuid, tech_id: Uuid) -> Result<Option<Job>, Error> {
        sqlx::query_as::<_, Job>(&format!(
            r#"
            UPDATE jobs
            SET seen_by_techs = CASE WHEN $2 = ANY(seen_by_techs)
                    THEN seen_by_techs ELSE array_append(seen_by_techs, $2) END,
                updated_at = NOW()
            WHERE id = $1
              AND $2 = ANY(notified_techs)
            RETURNING {JOB_COLUMNS}
            "#
        ))
        .bind(job_id)
        .bind(tech_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn cancel_job(&self, job_id: Uuid, client_id: Uuid) -> Result<Option<Job>, Error> {
        sqlx::query_as::<_, Job>(&format!(
            r#"
            UPDATE jobs
            SET status = 'cancelled'::job_status,
                assigned_tech_id = NULL,
                assigned_at = NULL,
                expires_at = NULL,
                updated_at = NOW()
            WHERE id = $1
              AND client_id = $2
              AND status IN ('created'::job_status, 'pending_assignment'::job_status,
                             'pending_accept'::job_status, 'partial'::job_status)
            RETURNING {JOB_COLUMNS}
            "#
        ))
        .bind(job_id)
        .bind(client_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_expired_offers(&self, now: DateTime<Utc>) -> Result<Vec<Job>, Error> {
        sqlx::query_as::<_, Job>(&format!(
            r#"
            SELECT {JOB_COLUMNS}
            FROM jobs
            WHERE status = 'pending_accept'::job_status AND expires_at < $1
            ORDER BY expires_at ASC
            "#
        ))
        .bind(now)
        .fetch_all(&self.pool)
        .await
    }
}
