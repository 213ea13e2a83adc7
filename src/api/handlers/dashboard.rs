//! # Dashboard Handler

use axum::{extract::State, Json};

use crate::{error::Result, models::DashboardResponse, services::AppState};

/// لیست همه لینک‌ها با آمار کلیک
///
/// # Endpoint
/// `GET /dashboard`
///
/// # Response
/// ```json
/// {
///   "links": [{ "id": "...", "shortCode": "aZ3kP9q", "clicks": 2, ... }],
///   "stats": { "totalLinks": 1, "totalClicks": 2, "averageClicks": 2 }
/// }
/// ```
pub async fn get_dashboard(State(state): State<AppState>) -> Result<Json<DashboardResponse>> {
    let dashboard = state.link_service.list().await?;

    Ok(Json(DashboardResponse::from_dashboard(
        &dashboard,
        state.config.base_url(),
    )))
}
