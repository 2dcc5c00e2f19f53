// handlers/users.rs
use std::sync::Arc;

use axum::{response::IntoResponse, routing::get, Extension, Json, Router};

use crate::{
    db::notificationdb::NotificationStore,
    dtos::{userdtos::FilterUserDto, ApiResponse},
    error::HttpError,
    middleware::JWTAuthMiddleware,
    AppState,
};

pub fn users_handler() -> Router {
    Router::new()
        .route("/me", get(get_me))
        .route("/notifications", get(get_my_notifications))
}

pub async fn get_me(
    Extension(auth): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    let filtered_user = FilterUserDto::filter_user(&auth.user);

    Ok(Json(ApiResponse::success(
        "User retrieved successfully",
        filtered_user,
    )))
}

pub async fn get_my_notifications(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    let notifications = app_state
        .db_client
        .get_notifications_for_user(auth.user.id, 50)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success(
        "Notifications retrieved successfully",
        notifications,
    )))
}
