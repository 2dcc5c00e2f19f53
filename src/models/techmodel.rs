use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "tech_category", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TechCategory {
    Electrician,
    SolarInstaller,
    CctvInstaller,
    GeneratorTechnician,
    InverterTechnician,
    ApplianceRepair,
    HvacTechnician,
    Plumber,
    Painter,
    Carpenter,
    Handyman,
    Other,
}

impl TechCategory {
    pub fn to_str(&self) -> &str {
        match self {
            TechCategory::Electrician => "electrician",
            TechCategory::SolarInstaller => "solar_installer",
            TechCategory::CctvInstaller => "cctv_installer",
            TechCategory::GeneratorTechnician => "generator_technician",
            TechCategory::InverterTechnician => "inverter_technician",
            TechCategory::ApplianceRepair => "appliance_repair",
            TechCategory::HvacTechnician => "hvac_technician",
            TechCategory::Plumber => "plumber",
            TechCategory::Painter => "painter",
            TechCategory::Carpenter => "carpenter",
            TechCategory::Handyman => "handyman",
            TechCategory::Other => "other",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct TechnicianProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category: TechCategory,
    pub experience_years: i32,
    pub description: String,
    pub location_state: String,
    pub location_city: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub is_online: Option<bool>,     // Database has DEFAULT FALSE, can be NULL
    pub rating: Option<f32>,         // Database has DEFAULT 0.0, can be NULL
    pub completed_jobs: Option<i32>, // Database has DEFAULT 0, can be NULL
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl TechnicianProfile {
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Some((lat, lng)),
            _ => None,
        }
    }
}
