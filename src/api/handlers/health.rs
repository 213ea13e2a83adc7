//! # Health Check Handler

use axum::{extract::State, http::StatusCode, Json};

use crate::{models::HealthResponse, services::AppState};

/// بررسی سلامت سرویس و اتصال دیتابیس
///
/// # Endpoint
/// `GET /health`
///
/// # Response
/// - 200 با `"status": "healthy"`
/// - 503 با `"status": "degraded"` اگه دیتابیس جواب نده
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let db_ok = state.link_service.is_healthy().await;

    let status = if db_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(HealthResponse::new(db_ok)))
}
