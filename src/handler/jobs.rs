// handlers/jobs.rs
use std::sync::Arc;

use axum::{
    extract::Path,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dtos::{jobdtos::*, ApiResponse},
    error::{ErrorMessage, HttpError},
    middleware::JWTAuthMiddleware,
    models::usermodel::UserRole,
    service::assignment_service::AssignmentOutcome,
    AppState,
};

pub fn jobs_handler() -> Router {
    Router::new()
        .route("/", post(book_job).get(get_my_jobs))
        .route("/:job_id", get(get_job_details))
        .route("/:job_id/cancel", post(cancel_job))
        .route("/:job_id/seen", post(mark_offer_seen))
        .route("/:job_id/respond", post(respond_to_offer))
}

pub async fn book_job(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Json(body): Json<BookJobDto>,
) -> Result<impl IntoResponse, HttpError> {
    if auth.user.role != UserRole::Client {
        return Err(HttpError::new(
            ErrorMessage::PermissionDenied.to_string(),
            StatusCode::FORBIDDEN,
        ));
    }

    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let outcome = app_state
        .job_service
        .book_job(auth.user.id, body)
        .await
        .map_err(HttpError::from)?;

    // Finding nobody is still a successful booking; the job waits for
    // assignment and is picked up again on the next availability change.
    let (message, data) = match outcome {
        AssignmentOutcome::Offered {
            job, technician, ..
        } => (
            "Job booked and offered to a nearby technician",
            BookingData {
                job,
                offered_technician: Some(technician),
                technician_available: true,
            },
        ),
        AssignmentOutcome::Exhausted { job } => (
            "Job booked; no technician available yet",
            BookingData {
                job,
                offered_technician: None,
                technician_available: false,
            },
        ),
    };

    Ok(Json(ApiResponse::success(message, data)))
}

pub async fn get_my_jobs(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    let jobs = app_state
        .job_service
        .get_client_jobs(auth.user.id)
        .await
        .map_err(HttpError::from)?;

    Ok(Json(ApiResponse::success(
        "Jobs retrieved successfully",
        jobs,
    )))
}

pub async fn get_job_details(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let job = app_state
        .job_service
        .get_job(job_id)
        .await
        .map_err(HttpError::from)?;

    // Visible to the requester, any technician it was offered to, and admins.
    let allowed = job.client_id == auth.user.id
        || job.notified_techs.contains(&auth.user.id)
        || auth.user.role == UserRole::Admin;

    if !allowed {
        return Err(HttpError::new(
            ErrorMessage::PermissionDenied.to_string(),
            StatusCode::FORBIDDEN,
        ));
    }

    Ok(Json(ApiResponse::success(
        "Job retrieved successfully",
        job,
    )))
}

pub async fn cancel_job(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let job = app_state
        .job_service
        .cancel_job(job_id, auth.user.id)
        .await
        .map_err(HttpError::from)?;

    Ok(Json(ApiResponse::success(
        "Job cancelled successfully",
        job,
    )))
}

pub async fn mark_offer_seen(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    if auth.user.role != UserRole::Technician {
        return Err(HttpError::new(
            ErrorMessage::PermissionDenied.to_string(),
            StatusCode::FORBIDDEN,
        ));
    }

    let job = app_state
        .job_service
        .mark_offer_seen(job_id, auth.user.id)
        .await
        .map_err(HttpError::from)?;

    Ok(Json(ApiResponse::success("Offer marked as seen", job)))
}

pub async fn respond_to_offer(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Path(job_id): Path<Uuid>,
    Json(body): Json<RespondToOfferDto>,
) -> Result<impl IntoResponse, HttpError> {
    if auth.user.role != UserRole::Technician {
        return Err(HttpError::new(
            ErrorMessage::PermissionDenied.to_string(),
            StatusCode::FORBIDDEN,
        ));
    }

    let outcome = app_state
        .acceptance_service
        .respond(job_id, auth.user.id, body.action)
        .await
        .map_err(HttpError::from)?;

    Ok(Json(ApiResponse::success(
        "Response recorded successfully",
        outcome,
    )))
}
