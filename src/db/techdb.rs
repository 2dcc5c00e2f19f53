// db/techdb.rs
use async_trait::async_trait;
use sqlx::Error;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::techmodel::{TechCategory, TechnicianProfile};

#[async_trait]
pub trait TechDirectory: Send + Sync {
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
    ) -> Result<TechnicianProfile, Error>;

    async fn get_technician_by_user(&self, user_id: Uuid)
        -> Result<Option<TechnicianProfile>, Error>;

    /// Online technicians in the job's region, for the ranking pass. Ordered
    /// by rating so the in-memory distance sort has a stable fallback order.
    async fn get_online_technicians(
        &self,
        state: &str,
        category: TechCategory,
    ) -> Result<Vec<TechnicianProfile>, Error>;

    async fn update_availability(
        &self,
        user_id: Uuid,
        is_online: bool,
    ) -> Result<TechnicianProfile, Error>;

    async fn update_location(
        &self,
        user_id: Uuid,
        latitude: f64,
        longitude: f64,
    ) -> Result<TechnicianProfile, Error>;
}

const TECH_COLUMNS: &str = r#"
    id, user_id, category, experience_years, description,
    location_state, location_city, latitude, longitude,
    is_online, rating, completed_jobs, created_at, updated_at
"#;

#[async_trait]
impl TechDirectory for DBClient {
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
    ) -> Result<TechnicianProfile, Error> {
        sqlx::query_as::<_, TechnicianProfile>(&format!(
            r#"
            INSERT INTO technician_profiles
            (user_id, category, experience_years, description, location_state,
            location_city, latitude, longitude)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {TECH_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(category)
        .bind(experience_years)
        .bind(description)
        .bind(location_state)
        .bind(location_city)
        .bind(latitude)
        .bind(longitude)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_technician_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<TechnicianProfile>, Error> {
        sqlx::query_as::<_, TechnicianProfile>(&format!(
            r#"
            SELECT {TECH_COLUMNS}
            FROM technician_profiles
            WHERE user_id = $1
            "#
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_online_technicians(
        &self,
        state: &str,
        category: TechCategory,
    ) -> Result<Vec<TechnicianProfile>, Error> {
        sqlx::query_as::<_, TechnicianProfile>(&format!(
            r#"
            SELECT {TECH_COLUMNS}
            FROM technician_profiles
            WHERE location_state = $1 AND category = $2 AND is_online = true
            ORDER BY rating DESC NULLS LAST, completed_jobs DESC NULLS LAST
            "#
        ))
        .bind(state)
        .bind(category)
        .fetch_all(&self.pool)
        .await
    }

    async fn update_availability(
        &self,
        user_id: Uuid,
        is_online: bool,
    ) -> Result<TechnicianProfile, Error> {
        sqlx::query_as::<_, TechnicianProfile>(&format!(
            r#"
            UPDATE technician_profiles
            SET is_online = $2, updated_at = NOW()
            WHERE user_id = $1
            RETURNING {TECH_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(is_online)
        .fetch_one(&self.pool)
        .await
    }

    async fn update_location(
        &self,
        user_id: Uuid,
        latitude: f64,
        longitude: f64,
    ) -> Result<TechnicianProfile, Error> {
        sqlx::query_as::<_, TechnicianProfile>(&format!(
            r#"
            UPDATE technician_profiles
            SET latitude = $2, longitude = $3, updated_at = NOW()
            WHERE user_id = $1
            RETURNING {TECH_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(latitude)
        .bind(longitude)
        .fetch_one(&self.pool)
        .await
    }
}
