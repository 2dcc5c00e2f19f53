// In-memory store implementing the storage traits so the dispatch services
// can be exercised without a database. Each method mirrors the conditional
// semantics of the Postgres implementation; a single lock per call keeps the
// check-and-set steps atomic the way the row-level updates are.
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use wireconnect::db::jobdb::JobStore;
use wireconnect::db::notificationdb::NotificationStore;
use wireconnect::db::techdb::TechDirectory;
use wireconnect::dtos::jobdtos::BookJobDto;
use wireconnect::models::jobmodel::{Job, JobStatus};
use wireconnect::models::notificationmodel::Notification;
use wireconnect::models::techmodel::{TechCategory, TechnicianProfile};
use wireconnect::service::acceptance_service::AcceptanceService;
use wireconnect::service::assignment_service::AssignmentService;
use wireconnect::service::job_service::JobService;
use wireconnect::service::matching_service::MatchingService;
use wireconnect::service::notification_service::NotificationService;

#[derive(Default)]
pub struct MemoryStore {
    pub jobs: Mutex<HashMap<Uuid, Job>>,
    pub technicians: Mutex<Vec<TechnicianProfile>>,
    pub notifications: Mutex<Vec<Notification>>,
}

fn push_unique(set: &mut Vec<Uuid>, id: Uuid) {
    if !set.contains(&id) {
        set.push(id);
    }
}

#[async_trait]
impl JobStore for MemoryStore {
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
    ) -> Result<Job, sqlx::Error> {
        let job = Job {
            id: Uuid::new_v4(),
            client_id,
            category,
            title,
            description,
            location_state,
            location_city,
            location_address,
            latitude,
            longitude,
            price,
            workers_needed,
            status: JobStatus::Created,
            assigned_tech_id: None,
            assigned_tech_ids: vec![],
            declined_techs: vec![],
            notified_techs: vec![],
            seen_by_techs: vec![],
            assigned_at: None,
            expires_at: None,
            accepted_at: None,
            created_at: Some(Utc::now()),
            updated_at: Some(Utc::now()),
        };

        self.jobs.lock().unwrap().insert(job.id, job.clone());
        Ok(job)
    }

    async fn get_job_by_id(&self, job_id: Uuid) -> Result<Option<Job>, sqlx::Error> {
        Ok(self.jobs.lock().unwrap().get(&job_id).cloned())
    }

    async fn get_jobs_by_client(&self, client_id: Uuid) -> Result<Vec<Job>, sqlx::Error> {
        Ok(self
            .jobs
            .lock()
            .unwrap()
            .values()
            .filter(|job| job.client_id == client_id)
            .cloned()
            .collect())
    }

    async fn get_jobs(&self, _page: u32, _limit: usize) -> Result<Vec<Job>, sqlx::Error> {
        Ok(self.jobs.lock().unwrap().values().cloned().collect())
    }

    async fn get_offers_for_tech(&self, tech_id: Uuid) -> Result<Vec<Job>, sqlx::Error> {
        Ok(self
            .jobs
            .lock()
            .unwrap()
            .values()
            .filter(|job| {
                job.status == JobStatus::PendingAccept && job.assigned_tech_id == Some(tech_id)
            })
            .cloned()
            .collect())
    }

    async fn reserve_if_available(
        &self,
        job_id: Uuid,
        tech_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<Option<Job>, sqlx::Error> {
        let mut jobs = self.jobs.lock().unwrap();
        let Some(job) = jobs.get_mut(&job_id) else {
            return Ok(None);
        };

        if !job.status.is_reservable()
            || job.declined_techs.contains(&tech_id)
            || job.assigned_tech_ids.contains(&tech_id)
        {
            return Ok(None);
        }

        job.status = JobStatus::PendingAccept;
        job.assigned_tech_id = Some(tech_id);
        job.assigned_at = Some(Utc::now());
        job.expires_at = Some(expires_at);
        push_unique(&mut job.notified_techs, tech_id);
        job.updated_at = Some(Utc::now());

        Ok(Some(job.clone()))
    }

    async fn release_offer(
        &self,
        job_id: Uuid,
        tech_id: Uuid,
    ) -> Result<Option<Job>, sqlx::Error> {
        let mut jobs = self.jobs.lock().unwrap();
        let Some(job) = jobs.get_mut(&job_id) else {
            return Ok(None);
        };

        if job.status != JobStatus::PendingAccept
            || job.assigned_tech_id != Some(tech_id)
            || job.assigned_tech_ids.contains(&tech_id)
        {
            return Ok(None);
        }

        job.status = JobStatus::PendingAssignment;
        job.assigned_tech_id = None;
        job.assigned_at = None;
        job.expires_at = None;
        push_unique(&mut job.declined_techs, tech_id);
        job.updated_at = Some(Utc::now());

        Ok(Some(job.clone()))
    }

    async fn record_decline(&self, job_id: Uuid, tech_id: Uuid) -> Result<(), sqlx::Error> {
        let mut jobs = self.jobs.lock().unwrap();
        if let Some(job) = jobs.get_mut(&job_id) {
            if !job.assigned_tech_ids.contains(&tech_id) {
                push_unique(&mut job.declined_techs, tech_id);
            }
        }
        Ok(())
    }

    async fn record_acceptance(
        &self,
        job_id: Uuid,
        tech_id: Uuid,
    ) -> Result<Option<Job>, sqlx::Error> {
        let mut jobs = self.jobs.lock().unwrap();
        let Some(job) = jobs.get_mut(&job_id) else {
            return Ok(None);
        };

        let reachable = matches!(job.status, JobStatus::PendingAccept | JobStatus::Partial);
        let authorized =
            job.assigned_tech_id == Some(tech_id) || job.notified_techs.contains(&tech_id);

        if !reachable
            || !authorized
            || job.declined_techs.contains(&tech_id)
            || job.assigned_tech_ids.len() >= job.workers_needed as usize
        {
            return Ok(None);
        }

        push_unique(&mut job.assigned_tech_ids, tech_id);
        job.updated_at = Some(Utc::now());

        Ok(Some(job.clone()))
    }

    async fn clear_offer_after_acceptance(
        &self,
        job_id: Uuid,
        tech_id: Uuid,
    ) -> Result<Option<Job>, sqlx::Error> {
        let mut jobs = self.jobs.lock().unwrap();
        let Some(job) = jobs.get_mut(&job_id) else {
            return Ok(None);
        };

        if job.status != JobStatus::PendingAccept || job.assigned_tech_id != Some(tech_id) {
            return Ok(None);
        }

        job.status = JobStatus::Partial;
        job.assigned_tech_id = None;
        job.assigned_at = None;
        job.expires_at = None;
        job.updated_at = Some(Utc::now());

        Ok(Some(job.clone()))
    }

    async fn finalize_job(&self, job_id: Uuid) -> Result<Option<Job>, sqlx::Error> {
        let mut jobs = self.jobs.lock().unwrap();
        let Some(job) = jobs.get_mut(&job_id) else {
            return Ok(None);
        };

        let reachable = matches!(job.status, JobStatus::PendingAccept | JobStatus::Partial);
        if !reachable || job.assigned_tech_ids.len() < job.workers_needed as usize {
            return Ok(None);
        }

        job.status = JobStatus::Accepted;
        job.accepted_at = Some(Utc::now());
        job.expires_at = None;
        job.updated_at = Some(Utc::now());

        Ok(Some(job.clone()))
    }

    async fn mark_pending_assignment(&self, job_id: Uuid) -> Result<Option<Job>, sqlx::Error> {
        let mut jobs = self.jobs.lock().unwrap();
        let Some(job) = jobs.get_mut(&job_id) else {
            return Ok(None);
        };

        if !job.status.is_reservable() {
            return Ok(None);
        }

        job.status = JobStatus::PendingAssignment;
        job.assigned_tech_id = None;
        job.assigned_at = None;
        job.expires_at = None;
        job.updated_at = Some(Utc::now());

        Ok(Some(job.clone()))
    }

    async fn mark_seen(&self, job_id: Uuid, tech_id: Uuid) -> Result<Option<Job>, sqlx::Error> {
        let mut jobs = self.jobs.lock().unwrap();
        let Some(job) = jobs.get_mut(&job_id) else {
            return Ok(None);
        };

        if !job.notified_techs.contains(&tech_id) {
            return Ok(None);
        }

        push_unique(&mut job.seen_by_techs, tech_id);
        job.updated_at = Some(Utc::now());

        Ok(Some(job.clone()))
    }

    async fn cancel_job(&self, job_id: Uuid, client_id: Uuid) -> Result<Option<Job>, sqlx::Error> {
        let mut jobs = self.jobs.lock().unwrap();
        let Some(job) = jobs.get_mut(&job_id) else {
            return Ok(None);
        };

        let cancellable = matches!(
            job.status,
            JobStatus::Created
                | JobStatus::PendingAssignment
                | JobStatus::PendingAccept
                | JobStatus::Partial
        );

        if job.client_id != client_id || !cancellable {
            return Ok(None);
        }

        job.status = JobStatus::Cancelled;
        job.assigned_tech_id = None;
        job.assigned_at = None;
        job.expires_at = None;
        job.updated_at = Some(Utc::now());

        Ok(Some(job.clone()))
    }

    async fn get_expired_offers(&self, now: DateTime<Utc>) -> Result<Vec<Job>, sqlx::Error> {
        Ok(self
            .jobs
            .lock()
            .unwrap()
            .values()
            .filter(|job| {
                job.status == JobStatus::PendingAccept
                    && job.expires_at.map(|t| t < now).unwrap_or(false)
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl TechDirectory for MemoryStore {
    async fn create_technician_profile(
        &self,
        user_id: Uuid,
        category: TechCategory,
        experience_years: i32,
        description: String,
        location_state: String,
        location_city: String,
        latitude: Option<f64>,
        longitude: Option<f64>,
    ) -> Result<TechnicianProfile, sqlx::Error> {
        let profile = TechnicianProfile {
            id: Uuid::new_v4(),
            user_id,
            category,
            experience_years,
            description,
            location_state,
            location_city,
            latitude,
            longitude,
            is_online: Some(true),
            rating: Some(0.0),
            completed_jobs: Some(0),
            created_at: Some(Utc::now()),
            updated_at: Some(Utc::now()),
        };

        self.technicians.lock().unwrap().push(profile.clone());
        Ok(profile)
    }

    async fn get_technician_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<TechnicianProfile>, sqlx::Error> {
        Ok(self
            .technicians
            .lock()
            .unwrap()
            .iter()
            .find(|tech| tech.user_id == user_id)
            .cloned())
    }

    async fn get_online_technicians(
        &self,
        state: &str,
        category: TechCategory,
    ) -> Result<Vec<TechnicianProfile>, sqlx::Error> {
        Ok(self
            .technicians
            .lock()
            .unwrap()
            .iter()
            .filter(|tech| {
                tech.location_state == state
                    && tech.category == category
                    && tech.is_online.unwrap_or(false)
            })
            .cloned()
            .collect())
    }

    async fn update_availability(
        &self,
        user_id: Uuid,
        is_online: bool,
    ) -> Result<TechnicianProfile, sqlx::Error> {
        let mut technicians = self.technicians.lock().unwrap();
        let tech = technicians
            .iter_mut()
            .find(|tech| tech.user_id == user_id)
            .ok_or(sqlx::Error::RowNotFound)?;

        tech.is_online = Some(is_online);
        Ok(tech.clone())
    }

    async fn update_location(
        &self,
        user_id: Uuid,
        latitude: f64,
        longitude: f64,
    ) -> Result<TechnicianProfile, sqlx::Error> {
        let mut technicians = self.technicians.lock().unwrap();
        let tech = technicians
            .iter_mut()
            .find(|tech| tech.user_id == user_id)
            .ok_or(sqlx::Error::RowNotFound)?;

        tech.latitude = Some(latitude);
        tech.longitude = Some(longitude);
        Ok(tech.clone())
    }
}

#[async_trait]
impl NotificationStore for MemoryStore {
    async fn store_notification(
        &self,
        user_id: Option<Uuid>,
        kind: &str,
        job_id: Option<Uuid>,
        payload: Option<serde_json::Value>,
        message: String,
    ) -> Result<(), sqlx::Error> {
        self.notifications.lock().unwrap().push(Notification {
            id: Uuid::new_v4(),
            user_id,
            kind: kind.to_string(),
            job_id,
            payload,
            message,
            created_at: Some(Utc::now()),
        });
        Ok(())
    }

    async fn get_notifications_for_user(
        &self,
        user_id: Uuid,
        _limit: usize,
    ) -> Result<Vec<Notification>, sqlx::Error> {
        Ok(self
            .notifications
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.user_id == Some(user_id) || n.user_id.is_none())
            .cloned()
            .collect())
    }
}

pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub assignment: Arc<AssignmentService>,
    pub acceptance: Arc<AcceptanceService>,
    pub jobs: Arc<JobService>,
}

pub fn harness(reservation_window: Duration) -> Harness {
    let store = Arc::new(MemoryStore::default());

    let job_store: Arc<dyn JobStore> = store.clone();
    let directory: Arc<dyn TechDirectory> = store.clone();
    let notification_store: Arc<dyn NotificationStore> = store.clone();

    let notifications = Arc::new(NotificationService::new(notification_store));
    let matching = Arc::new(MatchingService::new(directory));

    let assignment = Arc::new(AssignmentService::new(
        job_store.clone(),
        matching,
        notifications.clone(),
        reservation_window,
    ));

    let acceptance = Arc::new(AcceptanceService::new(
        job_store.clone(),
        assignment.clone(),
        notifications.clone(),
    ));

    let jobs = Arc::new(JobService::new(job_store, assignment.clone(), notifications));

    Harness {
        store,
        assignment,
        acceptance,
        jobs,
    }
}

pub fn online_technician(lat: f64, lng: f64, rating: f32) -> TechnicianProfile {
    TechnicianProfile {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        category: TechCategory::Electrician,
        experience_years: 5,
        description: "certified electrician".to_string(),
        location_state: "Lagos".to_string(),
        location_city: "Ikeja".to_string(),
        latitude: Some(lat),
        longitude: Some(lng),
        is_online: Some(true),
        rating: Some(rating),
        completed_jobs: Some(20),
        created_at: Some(Utc::now()),
        updated_at: Some(Utc::now()),
    }
}

pub fn book_dto(workers_needed: i32) -> BookJobDto {
    BookJobDto {
        category: TechCategory::Electrician,
        title: "Replace burnt distribution board".to_string(),
        description: "The 12-way DB in the hallway burnt out and needs replacing".to_string(),
        location_state: "Lagos".to_string(),
        location_city: "Ikeja".to_string(),
        location_address: "14 Allen Avenue".to_string(),
        latitude: Some(6.6018),
        longitude: Some(3.3515),
        price: 45_000.0,
        workers_needed: Some(workers_needed),
    }
}
