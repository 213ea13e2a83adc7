//! # لایه API
//!
//! ## ساختار URL‌ها:
//! - `POST /` و `POST /api/shorten` - ساخت لینک کوتاه
//! - `GET /:code` - Redirect به URL اصلی
//! - `DELETE /api/delete-url?urlId=<id>` - حذف لینک
//! - `GET /dashboard` - لیست لینک‌ها و آمار
//! - `GET /health` - Health check

mod handlers;
mod middleware;
mod extractors;

pub use handlers::*;
pub use middleware::*;
pub use extractors::*;

use std::time::Duration;

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{config::Config, database::Database, services::AppState};

/// حداکثر زمان پردازش هر request
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// =====================================
// Router Builder
// =====================================
/// ساخت Router اصلی روی دیتابیس SQLite
pub fn create_router(db: Database, config: Config) -> Router {
    router(AppState::new(db, config))
}

/// ساخت Router با یک state آماده (مثلا با store دیگه در تست‌ها)
pub fn router(state: AppState) -> Router {
    Router::new()
        // ساخت لینک (فرم صفحه اصلی)
        .route("/", post(handlers::link::create_link))
        .route("/dashboard", get(handlers::dashboard::get_dashboard))
        .route("/health", get(handlers::health::health_check))
        // route‌های ثابت بالا نسبت به این اولویت دارن
        .route("/:code", get(handlers::link::redirect))
        .nest("/api", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(axum_middleware::from_fn(middleware::request_id))
                .layer(TraceLayer::new_for_http().make_span_with(middleware::make_request_span))
                .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
                .layer(CompressionLayer::new())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                )
                .layer(axum_middleware::from_fn(middleware::security_headers)),
        )
        .with_state(state)
}

/// Route‌های API
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/shorten", post(handlers::link::create_link))
        .route("/delete-url", delete(handlers::link::delete_link))
}
