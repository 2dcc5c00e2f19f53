use thiserror::Error;
use uuid::Uuid;

use crate::{error::HttpError, models::jobmodel::JobStatus};

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Job {0} not found")]
    JobNotFound(Uuid),

    #[error("Technician profile not found for user {0}")]
    TechnicianNotFound(Uuid),

    #[error("Technician {0} does not hold the current offer for job {1}")]
    NotCurrentOfferee(Uuid, Uuid),

    #[error("Job {0} is not in status {1:?}")]
    InvalidJobStatus(Uuid, JobStatus),

    #[error("User {0} is not authorized to perform this action on job {1}")]
    UnauthorizedJobAccess(Uuid, Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Notification error: {0}")]
    Notification(String),
}

impl From<ServiceError> for HttpError {
    fn from(error: ServiceError) -> Self {
        match error {
            ServiceError::JobNotFound(_) | ServiceError::TechnicianNotFound(_) => {
                HttpError::not_found(error.to_string())
            }

            ServiceError::InvalidJobStatus(_, _) | ServiceError::Validation(_) => {
                HttpError::bad_request(error.to_string())
            }

            ServiceError::NotCurrentOfferee(_, _) | ServiceError::UnauthorizedJobAccess(_, _) => {
                HttpError::unauthorized(error.to_string())
            }

            _ => HttpError::server_error(error.to_string()),
        }
    }
}
