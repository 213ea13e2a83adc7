//! # Middleware
//!
//! Middleware‌های سفارشی که روی همه route‌ها اعمال میشن.

use axum::{
    body::Body,
    http::{header::HeaderValue, HeaderMap, Request},
    middleware::Next,
    response::IntoResponse,
};
use tracing::Span;

/// نام header شناسه درخواست
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

// =====================================
// Request ID Middleware
// =====================================
/// اضافه کردن Request ID به هر request و response
///
/// اگه کلاینت خودش header رو فرستاده باشه همون استفاده میشه،
/// وگرنه یه nanoid دوازده کاراکتری ساخته میشه.
///
/// باید بیرونی‌ترین layer باشه تا `make_request_span` شناسه رو ببینه.
pub async fn request_id(mut request: Request<Body>, next: Next) -> impl IntoResponse {
    let request_id = request_id_of(request.headers())
        .map(ToString::to_string)
        .unwrap_or_else(|| nanoid::nanoid!(12));

    let header_value = HeaderValue::from_str(&request_id).ok();

    if let Some(value) = header_value.clone() {
        request.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    let mut response = next.run(request).await;

    if let Some(value) = header_value {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

/// شناسه درخواست از header، اگه معتبر باشه
#[must_use]
pub fn request_id_of(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty() && v.len() <= 128)
}

/// span هر درخواست برای `TraceLayer`، همراه با `request_id`
pub fn make_request_span(request: &Request<Body>) -> Span {
    tracing::info_span!(
        "http_request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = request_id_of(request.headers()).unwrap_or("-"),
    )
}

// =====================================
// Security Headers Middleware
// =====================================
/// اضافه کردن header‌های امنیتی به همه پاسخ‌ها
pub async fn security_headers(request: Request<Body>, next: Next) -> impl IntoResponse {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert("X-Content-Type-Options", HeaderValue::from_static("nosniff"));
    headers.insert("X-Frame-Options", HeaderValue::from_static("DENY"));
    headers.insert(
        "Referrer-Policy",
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );

    response
}
