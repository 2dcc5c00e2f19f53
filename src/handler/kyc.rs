// handlers/kyc.rs
use std::sync::Arc;

use axum::{
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use rand::Rng;
use validator::Validate;

use crate::{
    db::kycdb::KycExt,
    dtos::{kycdtos::*, ApiResponse},
    error::HttpError,
    middleware::JWTAuthMiddleware,
    AppState,
};

pub fn kyc_handler() -> Router {
    Router::new().route("/", post(submit_document).get(get_my_documents))
}

fn generate_reference() -> String {
    let number: u32 = rand::rng().random_range(100_000..1_000_000);
    format!("KYC-{}", number)
}

pub async fn submit_document(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Json(body): Json<SubmitKycDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let document = app_state
        .db_client
        .submit_document(
            auth.user.id,
            body.document_type,
            body.document_url,
            generate_reference(),
        )
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success(
        "Document submitted for review",
        document,
    )))
}

pub async fn get_my_documents(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    let documents = app_state
        .db_client
        .get_documents_for_user(auth.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success(
        "Documents retrieved successfully",
        documents,
    )))
}
