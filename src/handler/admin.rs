// handlers/admin.rs
use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    response::IntoResponse,
    routing::{get, put},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::{jobdb::JobStore, kycdb::KycExt, userdb::UserExt},
    dtos::{kycdtos::*, ApiResponse, RequestQueryDto},
    error::HttpError,
    middleware::JWTAuthMiddleware,
    models::kycmodel::KycStatus,
    AppState,
};

pub fn admin_handler() -> Router {
    Router::new()
        .route("/jobs", get(list_jobs))
        .route("/kyc/pending", get(list_pending_documents))
        .route("/kyc/:document_id/review", put(review_document))
}

pub async fn list_jobs(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query): Query<RequestQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(20);

    let jobs = app_state
        .db_client
        .get_jobs(page, limit)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success(
        "Jobs retrieved successfully",
        jobs,
    )))
}

pub async fn list_pending_documents(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query): Query<RequestQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(20);

    let documents = app_state
        .db_client
        .get_pending_documents(page, limit)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success(
        "Pending documents retrieved successfully",
        documents,
    )))
}

pub async fn review_document(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Path(document_id): Path<Uuid>,
    Json(body): Json<ReviewKycDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let status = match body.decision {
        KycDecision::Approve => KycStatus::Approved,
        KycDecision::Reject => KycStatus::Rejected,
    };

    let document = app_state
        .db_client
        .review_document(document_id, auth.user.id, status, body.notes)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| {
            HttpError::bad_request("Document not found or already reviewed".to_string())
        })?;

    // An approved document marks the owner as verified.
    if status == KycStatus::Approved {
        app_state
            .db_client
            .update_user_verified(document.user_id, true)
            .await
            .map_err(|e| HttpError::server_error(e.to_string()))?;
    }

    Ok(Json(ApiResponse::success(
        "Document reviewed successfully",
        document,
    )))
}
