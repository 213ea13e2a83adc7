//! # Custom Extractors
//!
//! - `BearerToken`: توکن از header `Authorization`
//! - `AdminAccess`: مجوز عملیات مدیریتی (حذف)
//! - `ValidatedJson`: بدنه JSON + اعتبارسنجی با `validator`

use axum::{
    async_trait,
    body::Body,
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts},
    http::{header, request::Parts, Request},
    Json,
};
use serde::de::DeserializeOwned;
use subtle::ConstantTimeEq;
use validator::Validate;

use crate::{error::AppError, services::AppState};

// =====================================
// Bearer Token Extractor
// =====================================
/// استخراج توکن از header Authorization
///
/// ```rust,ignore
/// async fn handler(BearerToken(token): BearerToken) -> ... { }
/// ```
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for BearerToken {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .ok_or_else(|| {
                AppError::Unauthorized("Invalid Authorization header format".to_string())
            })?;

        if token.is_empty() {
            return Err(AppError::Unauthorized("Empty token".to_string()));
        }

        Ok(BearerToken(token.to_string()))
    }
}

// =====================================
// Admin Access Extractor
// =====================================
/// مجوز حذف لینک
///
/// - `ADMIN_TOKEN` تنظیم نشده: همه مجازن (فقط برای توسعه)
/// - تنظیم شده: توکن Bearer باید دقیقا برابر باشه، وگرنه 401
#[derive(Debug, Clone, Copy)]
pub struct AdminAccess;

#[async_trait]
impl FromRequestParts<AppState> for AdminAccess {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(expected) = state.config.admin_token() else {
            return Ok(AdminAccess);
        };

        let BearerToken(token) = BearerToken::from_request_parts(parts, state).await?;

        if bool::from(token.as_bytes().ct_eq(expected.as_bytes())) {
            Ok(AdminAccess)
        } else {
            Err(AppError::Unauthorized("Invalid admin token".to_string()))
        }
    }
}

// =====================================
// JSON with Validation
// =====================================
/// استخراج JSON با اعتبارسنجی خودکار
///
/// JSON خراب یا فیلد گمشده و خطای اعتبارسنجی هر دو 400 میشن.
///
/// ```rust,ignore
/// async fn handler(ValidatedJson(data): ValidatedJson<CreateLinkRequest>) -> ... { }
/// ```
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request(req: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data): Json<T> = Json::from_request(req, state)
            .await
            .map_err(|e: JsonRejection| AppError::BadRequest(e.body_text()))?;

        data.validate()?;

        Ok(ValidatedJson(data))
    }
}
