pub mod acceptance_service;
pub mod assignment_service;
pub mod background_jobs;
pub mod error;
pub mod job_service;
pub mod matching_service;
pub mod notification_service;
