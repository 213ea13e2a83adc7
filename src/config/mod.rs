//! # ماژول تنظیمات (Configuration)
//!
//! تنظیمات با کتابخانه `config` از متغیرهای محیطی خونده میشه
//! (`.env` قبلش توسط `dotenvy` لود شده). `APP_URL` و `DATABASE_URL`
//! اجباری هستن و نبودنشون همون موقع startup خطا میده، نه وسط یه request.
//!
//! | متغیر | پیش‌فرض |
//! |-------|---------|
//! | `APP_URL` | - (اجباری) |
//! | `DATABASE_URL` | - (اجباری) |
//! | `HOST` | `0.0.0.0` |
//! | `PORT` | `3000` |
//! | `DATABASE_MAX_CONNECTIONS` | `10` |
//! | `SHORT_CODE_LENGTH` | `7` |
//! | `ADMIN_TOKEN` | - |
//! | `ENVIRONMENT` | `development` |

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::utils::{DEFAULT_SHORT_CODE_LENGTH, MAX_SHORT_CODE_LENGTH, MIN_SHORT_CODE_LENGTH};

/// تنظیمات اصلی برنامه
///
/// # مثال
/// ```rust
/// use shortlink::config::ConfigBuilder;
///
/// let config = ConfigBuilder::new().port(8080).build();
/// assert_eq!(config.server_addr(), "0.0.0.0:8080");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// آدرس هاست سرور
    pub host: String,

    /// پورت سرور
    pub port: u16,

    /// آدرس پایه برای ساخت `shortUrl`
    pub app_url: String,

    /// آدرس اتصال به دیتابیس
    pub database_url: String,

    /// حداکثر اتصال‌های همزمان pool
    pub database_max_connections: u32,

    /// طول کد کوتاه تولیدی
    pub short_code_length: usize,

    /// توکن ادمین برای حذف لینک‌ها (اختیاری)
    #[serde(default)]
    pub admin_token: Option<String>,

    /// محیط اجرا
    pub environment: Environment,
}

/// محیط اجرای برنامه
///
/// از هر رشته‌ای ساخته میشه؛ مقدار ناشناخته یعنی `Development`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Environment {
    #[default]
    Development,
    Testing,
    Production,
}

impl Environment {
    /// آیا در محیط تولید هستیم؟
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

impl From<String> for Environment {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            "testing" | "test" => Environment::Testing,
            _ => Environment::Development,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            app_url: "http://localhost:3000".to_string(),
            database_url: "sqlite://data/links.db?mode=rwc".to_string(),
            database_max_connections: 10,
            short_code_length: DEFAULT_SHORT_CODE_LENGTH,
            admin_token: None,
            environment: Environment::Development,
        }
    }
}

impl Config {
    /// ساخت تنظیمات از متغیرهای محیطی
    ///
    /// # Errors
    /// `AppError::Config` اگه `APP_URL` یا `DATABASE_URL` تنظیم نشده باشه
    /// یا اعتبارسنجی fail بشه.
    pub fn from_env() -> Result<Self> {
        Self::load_from(config::Environment::default().try_parsing(true))
    }

    /// ساخت تنظیمات از یک source دلخواه با همون پیش‌فرض‌ها
    ///
    /// # Errors
    /// مثل [`Config::from_env`]
    pub fn load_from<S>(source: S) -> Result<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let settings = config::Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 3000_i64)?
            .set_default("database_max_connections", 10_i64)?
            .set_default("short_code_length", DEFAULT_SHORT_CODE_LENGTH as i64)?
            .set_default("environment", "development")?
            .add_source(source)
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// اعتبارسنجی تنظیمات
    ///
    /// # Errors
    /// `AppError::Config` با توضیح مشکل
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(AppError::Config("PORT cannot be 0".to_string()));
        }

        if self.database_url.trim().is_empty() {
            return Err(AppError::Config("DATABASE_URL cannot be empty".to_string()));
        }

        if url::Url::parse(&self.app_url).is_err() {
            return Err(AppError::Config(format!(
                "APP_URL '{}' is not a valid absolute URL",
                self.app_url
            )));
        }

        if !(MIN_SHORT_CODE_LENGTH..=MAX_SHORT_CODE_LENGTH).contains(&self.short_code_length) {
            return Err(AppError::Config(format!(
                "SHORT_CODE_LENGTH must be between {MIN_SHORT_CODE_LENGTH} and {MAX_SHORT_CODE_LENGTH}"
            )));
        }

        if self.database_max_connections == 0 {
            return Err(AppError::Config(
                "DATABASE_MAX_CONNECTIONS cannot be 0".to_string(),
            ));
        }

        // در production حذف لینک بدون توکن مجاز نیست
        if self.environment.is_production() && self.admin_token().is_none() {
            return Err(AppError::Config(
                "ADMIN_TOKEN must be set in production".to_string(),
            ));
        }

        Ok(())
    }

    /// توکن ادمین، اگه تنظیم شده و خالی نباشه
    #[must_use]
    pub fn admin_token(&self) -> Option<&str> {
        self.admin_token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }

    /// آدرس پایه بدون `/` انتهایی
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.app_url.trim_end_matches('/')
    }

    /// آدرس کامل سرور برای bind
    #[must_use]
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// =====================================
// Builder Pattern
// =====================================
/// ساخت Config با Builder Pattern (بیشتر برای تست‌ها)
///
/// ```rust
/// use shortlink::config::ConfigBuilder;
///
/// let config = ConfigBuilder::new()
///     .app_url("https://sho.rt")
///     .admin_token("secret")
///     .build();
/// assert_eq!(config.admin_token(), Some("secret"));
/// ```
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    #[must_use]
    pub fn app_url(mut self, url: impl Into<String>) -> Self {
        self.config.app_url = url.into();
        self
    }

    #[must_use]
    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.config.database_url = url.into();
        self
    }

    #[must_use]
    pub fn short_code_length(mut self, length: usize) -> Self {
        self.config.short_code_length = length;
        self
    }

    #[must_use]
    pub fn admin_token(mut self, token: impl Into<String>) -> Self {
        self.config.admin_token = Some(token.into());
        self
    }

    #[must_use]
    pub fn environment(mut self, env: Environment) -> Self {
        self.config.environment = env;
        self
    }

    /// ساخت Config نهایی
    #[must_use]
    pub fn build(self) -> Config {
        self.config
    }

    /// ساخت Config با اعتبارسنجی
    ///
    /// # Errors
    /// اگه [`Config::validate`] خطا بده
    pub fn build_validated(self) -> Result<Config> {
        let config = self.build();
        config.validate()?;
        Ok(config)
    }
}
