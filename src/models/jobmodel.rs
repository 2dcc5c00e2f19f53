use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::techmodel::TechCategory;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "job_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Created,
    PendingAssignment,
    PendingAccept,
    Partial,
    Accepted,
    Cancelled,
}

impl JobStatus {
    pub fn to_str(&self) -> &str {
        match self {
            JobStatus::Created => "created",
            JobStatus::PendingAssignment => "pending_assignment",
            JobStatus::PendingAccept => "pending_accept",
            JobStatus::Partial => "partial",
            JobStatus::Accepted => "accepted",
            JobStatus::Cancelled => "cancelled",
        }
    }

    /// States from which a new offer may be placed.
    pub fn is_reservable(&self) -> bool {
        matches!(
            self,
            JobStatus::Created | JobStatus::PendingAssignment | JobStatus::Partial
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Accepted | JobStatus::Cancelled)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Job {
    pub id: Uuid,
    pub client_id: Uuid,
    pub category: TechCategory,
    pub title: String,
    pub description: String,
    pub location_state: String,
    pub location_city: String,
    pub location_address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub price: f64,
    pub workers_needed: i32,
    pub status: JobStatus,
    pub assigned_tech_id: Option<Uuid>,
    pub assigned_tech_ids: Vec<Uuid>,
    pub declined_techs: Vec<Uuid>,
    pub notified_techs: Vec<Uuid>,
    pub seen_by_techs: Vec<Uuid>,
    pub assigned_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>, // Database has DEFAULT NOW(), can be NULL
    pub updated_at: Option<DateTime<Utc>>,
}

impl Job {
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Some((lat, lng)),
            _ => None,
        }
    }

    pub fn accepted_count(&self) -> usize {
        self.assigned_tech_ids.len()
    }

    pub fn is_filled(&self) -> bool {
        self.accepted_count() >= self.workers_needed.max(0) as usize
    }

    /// A technician that was ever notified, has accepted, or has declined is
    /// never offered this job again.
    pub fn is_excluded(&self, tech_id: Uuid) -> bool {
        self.declined_techs.contains(&tech_id)
            || self.assigned_tech_ids.contains(&tech_id)
            || self.notified_techs.contains(&tech_id)
    }
}
