//! # سرویس لینک
//!
//! منطق کسب‌وکار روی `LinkStore`: ساخت، resolve، لیست و حذف.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::{
    config::Config,
    database::LinkStore,
    error::{AppError, OptionExt, Result},
    models::{Dashboard, Id, LinkStats, ShortLink},
    utils,
};

/// حداکثر تلاش برای پیدا کردن کد کوتاه آزاد
pub const MAX_CREATE_ATTEMPTS: usize = 3;

// =====================================
// Link Service
// =====================================
/// سرویس مدیریت لینک‌های کوتاه
#[derive(Clone)]
pub struct LinkService {
    store: Arc<dyn LinkStore>,
    code_length: usize,
    base_url: String,
}

impl LinkService {
    /// ساخت سرویس جدید
    #[must_use]
    pub fn new(store: Arc<dyn LinkStore>, config: &Config) -> Self {
        Self {
            store,
            code_length: config.short_code_length,
            base_url: config.base_url().to_string(),
        }
    }

    /// ساخت لینک کوتاه جدید
    ///
    /// اگه کد تولید شده تکراری باشه، کد جدید ساخته میشه و دوباره
    /// insert میشه (حداکثر `MAX_CREATE_ATTEMPTS` بار).
    ///
    /// # Errors
    /// - `InvalidUrl`: ورودی URL مطلق http/https نیست (هیچی ذخیره نمیشه)
    /// - `Internal`: بعد از همه تلاش‌ها کد آزاد پیدا نشد
    #[instrument(skip(self))]
    pub async fn create(&self, raw_url: &str) -> Result<ShortLink> {
        // فرم نرمال شده ذخیره میشه: percent-encoded و بدون کاراکتر کنترلی
        let parsed = utils::parse_link_url(raw_url).map_err(AppError::InvalidUrl)?;
        let original_url = parsed.as_str();

        for attempt in 1..=MAX_CREATE_ATTEMPTS {
            let code = utils::generate_short_code_with_length(self.code_length);

            match self.store.insert(original_url, &code).await {
                Ok(link) => {
                    info!(short_code = %link.short_code, id = %link.id, "Created short link");
                    return Ok(link);
                }
                Err(AppError::CodeCollision(code)) => {
                    warn!(attempt, short_code = %code, "Short code collision, regenerating");
                }
                Err(err) => return Err(err),
            }
        }

        Err(AppError::Internal(format!(
            "could not allocate a unique short code after {MAX_CREATE_ATTEMPTS} attempts"
        )))
    }

    /// پیدا کردن URL اصلی و ثبت یک کلیک
    ///
    /// شکست در افزایش کلیک فقط لاگ میشه و redirect رو خراب نمیکنه.
    ///
    /// # Errors
    /// `NotFound` اگه کد وجود نداشته باشه (هیچ تغییری انجام نمیشه)
    #[instrument(skip(self))]
    pub async fn resolve(&self, short_code: &str) -> Result<String> {
        if !utils::is_valid_short_code(short_code) {
            return Err(AppError::link_not_found(short_code));
        }

        let link = self
            .store
            .find_by_short_code(short_code)
            .await?
            .ok_or_not_found(format!("Short link '{short_code}' not found"))?;

        if let Err(err) = self.store.increment_clicks(&link.id).await {
            warn!(error = %err, short_code = %short_code, "Failed to increment click count");
        }

        Ok(link.original_url)
    }

    /// همه لینک‌ها (جدیدترین اول) به همراه آمار کلی
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Dashboard> {
        let links = self.store.list_all().await?;
        let stats = LinkStats::from_clicks(links.iter().map(|link| link.clicks));

        Ok(Dashboard { links, stats })
    }

    /// حذف لینک با شناسه
    ///
    /// # Errors
    /// - `BadRequest`: شناسه شکل معتبر نداره
    /// - `NotFound`: لینکی با این شناسه نیست (مثلا قبلا حذف شده)
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<()> {
        if !Id::is_well_formed(id) {
            return Err(AppError::BadRequest("Invalid link id".to_string()));
        }

        let link = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::id_not_found(id))?;

        self.store.delete_by_id(id).await?;

        info!(id = %id, short_code = %link.short_code, "Deleted short link");
        Ok(())
    }

    /// لینک کوتاه کامل برای نمایش به کاربر
    #[must_use]
    pub fn short_url(&self, link: &ShortLink) -> String {
        link.short_url(&self.base_url)
    }

    /// آیا store در دسترسه؟
    pub async fn is_healthy(&self) -> bool {
        self.store.ping().await.is_ok()
    }
}
