//! # مدل لینک کوتاه
//!
//! Entity و پاسخ API مربوط به ShortLink

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// =====================================
// ShortLink Entity
// =====================================
/// رکورد ذخیره شده: نگاشت کد کوتاه به URL اصلی
///
/// به جز `clicks` هیچ فیلدی بعد از ساخت عوض نمیشه.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ShortLink {
    /// شناسه یکتا (ساخته شده توسط store)
    pub id: String,

    /// کد کوتاه (مثلا "aZ3kP9q")
    pub short_code: String,

    /// آدرس اصلی
    pub original_url: String,

    /// تعداد دفعات resolve شدن
    pub clicks: i64,

    /// زمان ساخت
    pub created_at: DateTime<Utc>,
}

impl ShortLink {
    /// لینک کوتاه کامل با آدرس پایه
    ///
    /// ```rust
    /// use chrono::Utc;
    /// use shortlink::models::ShortLink;
    ///
    /// let link = ShortLink {
    ///     id: "id".into(),
    ///     short_code: "abc1234".into(),
    ///     original_url: "https://example.com".into(),
    ///     clicks: 0,
    ///     created_at: Utc::now(),
    /// };
    /// assert_eq!(link.short_url("https://sho.rt/"), "https://sho.rt/abc1234");
    /// ```
    #[must_use]
    pub fn short_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.short_code)
    }
}

// =====================================
// API Response DTO
// =====================================
/// یک ردیف از جدول داشبورد
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkResponse {
    pub id: String,
    pub short_code: String,
    pub short_url: String,
    pub original_url: String,
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
}

impl LinkResponse {
    /// تبدیل از entity
    #[must_use]
    pub fn from_link(link: &ShortLink, base_url: &str) -> Self {
        Self {
            id: link.id.clone(),
            short_code: link.short_code.clone(),
            short_url: link.short_url(base_url),
            original_url: link.original_url.clone(),
            clicks: link.clicks,
            created_at: link.created_at,
        }
    }
}
