// handlers/technicians.rs
use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use validator::Validate;

use crate::{
    db::techdb::TechDirectory,
    dtos::{techdtos::*, ApiResponse},
    error::{ErrorMessage, HttpError},
    middleware::JWTAuthMiddleware,
    models::usermodel::UserRole,
    AppState,
};

pub fn technicians_handler() -> Router {
    Router::new()
        .route("/profile", post(create_profile).get(get_my_profile))
        .route("/availability", put(update_availability))
        .route("/location", put(update_location))
        .route("/offers", get(get_open_offers))
}

fn require_technician(auth: &JWTAuthMiddleware) -> Result<(), HttpError> {
    if auth.user.role != UserRole::Technician {
        return Err(HttpError::new(
            ErrorMessage::PermissionDenied.to_string(),
            StatusCode::FORBIDDEN,
        ));
    }
    Ok(())
}

pub async fn create_profile(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Json(body): Json<CreateTechProfileDto>,
) -> Result<impl IntoResponse, HttpError> {
    require_technician(&auth)?;

    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let existing_profile = app_state
        .db_client
        .get_technician_by_user(auth.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    if existing_profile.is_some() {
        return Err(HttpError::bad_request("Technician profile already exists"));
    }

    let profile = app_state
        .db_client
        .create_technician_profile(
            auth.user.id,
            body.category,
            body.experience_years,
            body.description,
            body.location_state,
            body.location_city,
            body.latitude,
            body.longitude,
        )
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success(
        "Technician profile created successfully",
        profile,
    )))
}

pub async fn get_my_profile(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    let profile = app_state
        .db_client
        .get_technician_by_user(auth.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Technician profile not found"))?;

    Ok(Json(ApiResponse::success(
        "Technician profile retrieved successfully",
        profile,
    )))
}

pub async fn update_availability(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Json(body): Json<UpdateAvailabilityDto>,
) -> Result<impl IntoResponse, HttpError> {
    require_technician(&auth)?;

    let profile = app_state
        .db_client
        .update_availability(auth.user.id, body.is_online)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success(
        "Availability updated successfully",
        profile,
    )))
}

pub async fn update_location(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Json(body): Json<UpdateLocationDto>,
) -> Result<impl IntoResponse, HttpError> {
    require_technician(&auth)?;

    let profile = app_state
        .db_client
        .update_location(auth.user.id, body.latitude, body.longitude)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success(
        "Location updated successfully",
        profile,
    )))
}

pub async fn get_open_offers(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    require_technician(&auth)?;

    let offers = app_state
        .job_service
        .get_open_offers(auth.user.id)
        .await
        .map_err(HttpError::from)?;

    Ok(Json(ApiResponse::success(
        "Open offers retrieved successfully",
        offers,
    )))
}
