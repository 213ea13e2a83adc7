//! # Data Transfer Objects (DTOs)
//!
//! بدنه درخواست و پاسخ هر endpoint یه نوع مشخص داره.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{LinkResponse, ShortLink};

// =====================================
// Create
// =====================================
/// درخواست ساخت لینک کوتاه
///
/// ```json
/// { "url": "https://example.com/some/long/path" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateLinkRequest {
    /// آدرس اصلی
    #[validate(length(min = 1, max = 2048, message = "URL must be 1-2048 characters"))]
    pub url: String,
}

/// پاسخ ساخت موفق
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLinkResponse {
    pub success: bool,
    pub short_url: String,
    pub short_code: String,
}

// =====================================
// Delete
// =====================================
/// query string حذف: `?urlId=<id>`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeleteLinkQuery {
    #[serde(default, rename = "urlId")]
    pub url_id: Option<String>,
}

/// پاسخ خالی برای عملیات‌هایی که داده برنمیگردونن
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    #[must_use]
    pub fn ok() -> Self {
        Self { success: true }
    }
}

// =====================================
// Dashboard
// =====================================
/// آمار کلی لینک‌ها
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkStats {
    pub total_links: i64,
    pub total_clicks: i64,

    /// میانگین کلیک به ازای هر لینک، گرد شده به نزدیک‌ترین عدد صحیح
    pub average_clicks: i64,
}

impl LinkStats {
    /// محاسبه آمار از روی لیست
    ///
    /// ```rust
    /// use shortlink::models::LinkStats;
    ///
    /// let stats = LinkStats::from_clicks([1, 2]);
    /// assert_eq!(stats.average_clicks, 2); // 1.5 -> 2
    /// assert_eq!(LinkStats::from_clicks(Vec::new()).average_clicks, 0);
    /// ```
    #[must_use]
    pub fn from_clicks(clicks: impl IntoIterator<Item = i64>) -> Self {
        let (total_links, total_clicks) = clicks
            .into_iter()
            .fold((0_i64, 0_i64), |(count, sum), c| (count + 1, sum + c));

        let average_clicks = if total_links == 0 {
            0
        } else {
            (total_clicks as f64 / total_links as f64).round() as i64
        };

        Self {
            total_links,
            total_clicks,
            average_clicks,
        }
    }
}

/// نتیجه سرویس برای داشبورد
#[derive(Debug, Clone)]
pub struct Dashboard {
    /// جدیدترین‌ها اول
    pub links: Vec<ShortLink>,
    pub stats: LinkStats,
}

/// پاسخ `GET /dashboard`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub links: Vec<LinkResponse>,
    pub stats: LinkStats,
}

impl DashboardResponse {
    #[must_use]
    pub fn from_dashboard(dashboard: &Dashboard, base_url: &str) -> Self {
        Self {
            links: dashboard
                .links
                .iter()
                .map(|link| LinkResponse::from_link(link, base_url))
                .collect(),
            stats: dashboard.stats,
        }
    }
}

// =====================================
// Health Check
// =====================================
/// پاسخ health check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: bool,
}

impl HealthResponse {
    #[must_use]
    pub fn new(database_ok: bool) -> Self {
        Self {
            status: if database_ok { "healthy" } else { "degraded" }.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            database: database_ok,
        }
    }
}
