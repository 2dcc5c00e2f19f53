use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    models::{jobmodel::Job, techmodel::TechCategory, techmodel::TechnicianProfile},
    service::acceptance_service::OfferAction,
};

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct BookJobDto {
    pub category: TechCategory,

    #[validate(length(min = 1, max = 100, message = "Title must be between 1 and 100 characters"))]
    pub title: String,

    #[validate(length(min = 20, max = 2000, message = "Description must be between 20 and 2000 characters"))]
    pub description: String,

    #[validate(length(min = 1, message = "State is required"))]
    pub location_state: String,

    #[validate(length(min = 1, message = "City is required"))]
    pub location_city: String,

    #[validate(length(min = 1, message = "Address is required"))]
    pub location_address: String,

    pub latitude: Option<f64>,
    pub longitude: Option<f64>,

    #[validate(range(min = 1.0, message = "Price must be positive"))]
    pub price: f64,

    #[validate(range(min = 1, max = 20, message = "Workers needed must be between 1 and 20"))]
    pub workers_needed: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RespondToOfferDto {
    pub action: OfferAction,
}

/// Booking response: either the job went out to a technician or no one is
/// available yet and the job waits for assignment.
#[derive(Debug, Serialize)]
pub struct BookingData {
    pub job: Job,
    pub offered_technician: Option<TechnicianProfile>,
    pub technician_available: bool,
}
