use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::techmodel::TechCategory;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateTechProfileDto {
    pub category: TechCategory,

    #[validate(range(min = 0, max = 50, message = "Experience must be between 0 and 50 years"))]
    pub experience_years: i32,

    #[validate(length(min = 10, max = 1000, message = "Description must be between 10 and 1000 characters"))]
    pub description: String,

    #[validate(length(min = 1, message = "State is required"))]
    pub location_state: String,

    #[validate(length(min = 1, message = "City is required"))]
    pub location_city: String,

    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateAvailabilityDto {
    pub is_online: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateLocationDto {
    pub latitude: f64,
    pub longitude: f64,
}
