// services/matching_service.rs
use std::sync::Arc;

use serde::Serialize;

use crate::{
    db::techdb::TechDirectory,
    models::{jobmodel::Job, techmodel::TechnicianProfile},
    service::error::ServiceError,
    utils::geo::haversine_distance_m,
};

/// A technician considered for one job during a single ranking pass. Derived,
/// never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct TechCandidate {
    pub profile: TechnicianProfile,
    pub distance_m: f64,
}

#[derive(Clone)]
pub struct MatchingService {
    directory: Arc<dyn TechDirectory>,
}

impl MatchingService {
    pub fn new(directory: Arc<dyn TechDirectory>) -> Self {
        Self { directory }
    }

    /// Fresh candidate pool for a job: online technicians in the job's state
    /// and category, nearest first, minus everyone already offered, declined
    /// or accepted.
    pub async fn rank_candidates(&self, job: &Job) -> Result<Vec<TechCandidate>, ServiceError> {
        let pool = self
            .directory
            .get_online_technicians(&job.location_state, job.category)
            .await?;

        Ok(Self::rank(job, pool))
    }

    pub fn rank(job: &Job, pool: Vec<TechnicianProfile>) -> Vec<TechCandidate> {
        let mut candidates: Vec<TechCandidate> = pool
            .into_iter()
            .filter(|tech| !job.is_excluded(tech.user_id))
            .map(|tech| {
                let distance_m = haversine_distance_m(job.coordinates(), tech.coordinates());
                TechCandidate {
                    profile: tech,
                    distance_m,
                }
            })
            .collect();

        // Unknown-location technicians carry infinite distance and end up at
        // the tail; ties fall back to rating, best first.
        candidates.sort_by(|a, b| {
            a.distance_m.total_cmp(&b.distance_m).then_with(|| {
                b.profile
                    .rating
                    .unwrap_or(0.0)
                    .total_cmp(&a.profile.rating.unwrap_or(0.0))
            })
        });

        candidates
    }
}
