// routes.rs
use std::sync::Arc;

use axum::{extract::Request, middleware, middleware::Next, routing::get, Extension, Json, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::{
    handler::{
        admin::admin_handler, auth::auth_handler, jobs::jobs_handler, kyc::kyc_handler,
        technicians::technicians_handler, users::users_handler,
    },
    middleware::{auth, role_check},
    models::usermodel::UserRole,
    AppState,
};

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "message": "Server is running"
    }))
}

async fn admin_only(req: Request, next: Next) -> impl axum::response::IntoResponse {
    role_check(req, next, vec![UserRole::Admin]).await
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let api = Router::new()
        .nest("/auth", auth_handler())
        .nest("/users", users_handler().layer(middleware::from_fn(auth)))
        .nest(
            "/technicians",
            technicians_handler().layer(middleware::from_fn(auth)),
        )
        .nest("/jobs", jobs_handler().layer(middleware::from_fn(auth)))
        .nest("/kyc", kyc_handler().layer(middleware::from_fn(auth)))
        .nest(
            "/admin",
            admin_handler()
                .layer(middleware::from_fn(admin_only))
                .layer(middleware::from_fn(auth)),
        );

    Router::new()
        .route("/api/healthcheck", get(health_check))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(Extension(app_state))
}
