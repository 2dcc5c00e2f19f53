pub mod config;
pub mod db;
pub mod dtos;
pub mod error;
pub mod handler;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod service;
pub mod utils;

use std::sync::Arc;
use std::time::Duration;

use config::Config;
use db::{
    db::DBClient, jobdb::JobStore, notificationdb::NotificationStore, techdb::TechDirectory,
};
use service::{
    acceptance_service::AcceptanceService, assignment_service::AssignmentService,
    job_service::JobService, matching_service::MatchingService,
    notification_service::NotificationService,
};

#[derive(Clone)]
pub struct AppState {
    pub env: Config,
    pub db_client: Arc<DBClient>,
    // Services
    pub matching_service: Arc<MatchingService>,
    pub assignment_service: Arc<AssignmentService>,
    pub acceptance_service: Arc<AcceptanceService>,
    pub job_service: Arc<JobService>,
    pub notification_service: Arc<NotificationService>,
}

impl AppState {
    pub fn new(db_client: DBClient, config: Config) -> Self {
        let db_client_arc = Arc::new(db_client);

        // The DBClient is the single ownership boundary for shared state; the
        // services only see it through the store traits.
        let store: Arc<dyn JobStore> = db_client_arc.clone();
        let directory: Arc<dyn TechDirectory> = db_client_arc.clone();
        let notification_store: Arc<dyn NotificationStore> = db_client_arc.clone();

        let notification_service = Arc::new(NotificationService::new(notification_store));
        let matching_service = Arc::new(MatchingService::new(directory));

        let assignment_service = Arc::new(AssignmentService::new(
            store.clone(),
            matching_service.clone(),
            notification_service.clone(),
            Duration::from_secs(config.reservation_window_secs),
        ));

        let acceptance_service = Arc::new(AcceptanceService::new(
            store.clone(),
            assignment_service.clone(),
            notification_service.clone(),
        ));

        let job_service = Arc::new(JobService::new(
            store,
            assignment_service.clone(),
            notification_service.clone(),
        ));

        Self {
            env: config,
            db_client: db_client_arc,
            matching_service,
            assignment_service,
            acceptance_service,
            job_service,
            notification_service,
        }
    }
}
