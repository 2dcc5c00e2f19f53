// service/background_jobs.rs
use std::sync::Arc;

use chrono::Utc;
use tokio::time::{interval, Duration};

use crate::{db::jobdb::JobStore, AppState};

/// Sweep for offers whose reservation window passed without the in-process
/// timer handling them (e.g. timers lost to a restart). `expire_offer` is
/// idempotent, so overlapping with a live timer is harmless.
pub async fn start_offer_expiry_job(app_state: Arc<AppState>) {
    let mut interval = interval(Duration::from_secs(60));

    loop {
        interval.tick().await;

        let expired = match app_state.db_client.get_expired_offers(Utc::now()).await {
            Ok(jobs) => jobs,
            Err(e) => {
                tracing::error!("offer expiry sweep failed to query store: {}", e);
                continue;
            }
        };

        if expired.is_empty() {
            continue;
        }

        tracing::info!("offer expiry sweep found {} stale offer(s)", expired.len());

        for job in expired {
            let Some(tech_id) = job.assigned_tech_id else {
                continue;
            };

            if let Err(e) = app_state
                .assignment_service
                .expire_offer(job.id, tech_id)
                .await
            {
                tracing::error!("offer expiry sweep failed for job {}: {}", job.id, e);
            }
        }
    }
}
