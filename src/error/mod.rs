//! # ماژول مدیریت خطاها (Error Handling)
//!
//! همه خطاهای سرویس در `AppError` جمع میشن و با `IntoResponse` مستقیم
//! به پاسخ HTTP تبدیل میشن.
//!
//! ## دسته‌بندی:
//! - **خطاهای کاربر (4xx)**: پیام خطا به کلاینت برمیگرده
//! - **خطاهای سرور (5xx)**: لاگ میشن و فقط یه پیام کلی به کلاینت میره

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

/// پیامی که برای همه خطاهای سرور به کلاینت برمیگرده
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

// =====================================
// Result Type Alias
// =====================================
/// نوع Result سفارشی برنامه
///
/// به جای `Result<ShortLink, AppError>` مینویسیم `Result<ShortLink>`
pub type Result<T, E = AppError> = std::result::Result<T, E>;

// =====================================
// Custom Error Enum
// =====================================
/// خطای اصلی برنامه
#[derive(Debug, Error)]
pub enum AppError {
    // ----------------------------------------
    // خطاهای کاربر (4xx)
    // ----------------------------------------

    /// URL ورودی یک آدرس مطلق معتبر نیست - 400
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// درخواست نامعتبر (JSON خراب، پارامتر گمشده) - 400
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// توکن ادمین نیست یا اشتباهه - 401
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// پیدا نشد - 404
    #[error("Not found: {0}")]
    NotFound(String),

    // ----------------------------------------
    // خطاهای سرور (5xx)
    // ----------------------------------------

    /// کد کوتاه تکراری در دیتابیس
    ///
    /// سرویس این خطا رو با تولید کد جدید handle میکنه و فقط اگه
    /// به بیرون نشت کنه به 500 تبدیل میشه.
    #[error("Short code collision: {0}")]
    CodeCollision(String),

    /// خطای داخلی سرور - 500
    #[error("Internal server error: {0}")]
    Internal(String),

    /// خطای تنظیمات (فقط موقع startup)
    #[error("Configuration error: {0}")]
    Config(String),

    // ----------------------------------------
    // خطاهای تبدیل شده از کتابخانه‌ها
    // ----------------------------------------

    /// خطای دیتابیس (اتصال، query، ...)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// خطای migration
    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    /// خطای IO
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// HTTP status code متناسب با خطا
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 4xx Client Errors
            Self::InvalidUrl(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,

            // 5xx Server Errors
            Self::CodeCollision(_)
            | Self::Internal(_)
            | Self::Config(_)
            | Self::Database(_)
            | Self::Migrate(_)
            | Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// آیا این یه خطای سرور هست؟
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// پیامی که به کلاینت نشون داده میشه
    ///
    /// جزئیات خطاهای سرور هیچوقت بیرون نمیره.
    #[must_use]
    pub fn public_message(&self) -> String {
        if self.is_server_error() {
            return INTERNAL_ERROR_MESSAGE.to_string();
        }

        match self {
            Self::InvalidUrl(msg)
            | Self::BadRequest(msg)
            | Self::Unauthorized(msg)
            | Self::NotFound(msg) => msg.clone(),
            _ => self.to_string(),
        }
    }

    /// ساخت خطای Not Found برای کد کوتاه
    #[must_use]
    pub fn link_not_found(short_code: &str) -> Self {
        Self::NotFound(format!("Short link '{short_code}' not found"))
    }

    /// ساخت خطای Not Found برای شناسه
    #[must_use]
    pub fn id_not_found(id: &str) -> Self {
        Self::NotFound(format!("Short link with id '{id}' not found"))
    }
}

// =====================================
// Error Response DTO
// =====================================
/// بدنه پاسخ خطا در API
///
/// ```json
/// { "success": false, "error": "Invalid URL format", "status_code": 400 }
/// ```
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,

    /// پیام خطا
    pub error: String,

    /// کد وضعیت HTTP
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

impl ErrorResponse {
    /// ساخت پاسخ خطای جدید
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            status_code: None,
        }
    }

    /// اضافه کردن کد وضعیت
    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status_code = Some(status.as_u16());
        self
    }
}

// =====================================
// IntoResponse Implementation
// =====================================
/// تبدیل AppError به Response
///
/// این باعث میشه handler‌ها بتونن مستقیم `Result<_, AppError>` برگردونن.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // خطاهای سرور با جزئیات کامل لاگ میشن
        if self.is_server_error() {
            error!(error = %self, "Server error occurred");
        }

        let status = self.status_code();
        let body = ErrorResponse::new(self.public_message()).with_status(status);

        (status, Json(body)).into_response()
    }
}

// =====================================
// From Implementations
// =====================================
impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

// =====================================
// Option Extensions
// =====================================
/// Extension trait برای Option
pub trait OptionExt<T> {
    /// تبدیل None به AppError::NotFound
    fn ok_or_not_found(self, message: impl Into<String>) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self, message: impl Into<String>) -> Result<T> {
        self.ok_or_else(|| AppError::NotFound(message.into()))
    }
}
