//! # Link Handlers
//!
//! ساخت، redirect و حذف لینک کوتاه

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderValue, StatusCode},
    Json,
};
use tracing::debug;

use crate::{
    api::extractors::{AdminAccess, ValidatedJson},
    error::{AppError, Result},
    models::{CreateLinkRequest, CreateLinkResponse, DeleteLinkQuery, SuccessResponse},
    services::AppState,
};

// =====================================
// Create Short Link
// =====================================
/// ساخت لینک کوتاه جدید
///
/// # Endpoint
/// `POST /` یا `POST /api/shorten`
///
/// # Request Body
/// ```json
/// { "url": "https://example.com/long-url" }
/// ```
///
/// # Response
/// ```json
/// { "success": true, "shortUrl": "http://localhost:3000/aZ3kP9q", "shortCode": "aZ3kP9q" }
/// ```
pub async fn create_link(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateLinkRequest>,
) -> Result<Json<CreateLinkResponse>> {
    let link = state.link_service.create(&request.url).await?;

    Ok(Json(CreateLinkResponse {
        success: true,
        short_url: state.link_service.short_url(&link),
        short_code: link.short_code,
    }))
}

// =====================================
// Redirect
// =====================================
/// Redirect به URL اصلی و ثبت کلیک
///
/// # Endpoint
/// `GET /:code`
///
/// # Response
/// - 307 به URL اصلی
/// - 404 اگه کد پیدا نشه
/// - 500 اگه URL ذخیره شده توی header `Location` جا نشه
pub async fn redirect(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<(StatusCode, [(header::HeaderName, HeaderValue); 1])> {
    let original_url = state.link_service.resolve(&code).await?;

    let location = HeaderValue::try_from(original_url.as_str()).map_err(|err| {
        AppError::Internal(format!(
            "stored URL for '{code}' is not a valid Location header: {err}"
        ))
    })?;

    debug!(short_code = %code, "Redirecting");

    Ok((StatusCode::TEMPORARY_REDIRECT, [(header::LOCATION, location)]))
}

// =====================================
// Delete
// =====================================
/// حذف لینک با شناسه
///
/// اگه `ADMIN_TOKEN` تنظیم شده باشه، header
/// `Authorization: Bearer <token>` لازمه.
///
/// # Endpoint
/// `DELETE /api/delete-url?urlId=<id>`
pub async fn delete_link(
    State(state): State<AppState>,
    _admin: AdminAccess,
    Query(query): Query<DeleteLinkQuery>,
) -> Result<Json<SuccessResponse>> {
    let id = query
        .url_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing urlId".to_string()))?;

    state.link_service.delete(id).await?;

    Ok(Json(SuccessResponse::ok()))
}
