//! # Shortlink
//!
//! سرویس کوتاه‌کننده URL: ساخت کد کوتاه، redirect با شمارش کلیک،
//! داشبورد آمار و حذف لینک.
//!
//! ## ساختار پروژه
//!
//! ```text
//! src/
//! ├── lib.rs          # نقطه ورود کتابخانه
//! ├── main.rs         # نقطه ورود باینری
//! ├── config/         # تنظیمات از متغیرهای محیطی
//! ├── error/          # AppError و تبدیل به پاسخ HTTP
//! ├── database/       # pool و LinkStore
//! ├── models/         # ShortLink و DTO‌ها
//! ├── services/       # LinkService و AppState
//! ├── api/            # Router، handler‌ها و middleware‌ها
//! └── utils/          # تولید کد و اعتبارسنجی URL
//! ```
//!
//! ## مثال استفاده
//!
//! ```rust,no_run
//! use shortlink::{api::create_router, config::Config, database::Database};
//!
//! #[tokio::main]
//! async fn main() -> shortlink::Result<()> {
//!     let config = Config::from_env()?;
//!     let db = Database::connect(&config.database_url, config.database_max_connections).await?;
//!     db.migrate().await?;
//!     let _app = create_router(db, config);
//!     Ok(())
//! }
//! ```

/// تنظیمات برنامه
pub mod config;

/// خطاها
pub mod error;

/// لایه دیتابیس
pub mod database;

/// مدل‌های داده
pub mod models;

/// منطق کسب‌وکار
pub mod services;

/// لایه HTTP
pub mod api;

/// توابع کمکی
pub mod utils;

// =====================================
// Re-exports
// =====================================
pub use error::Result;
pub use error::AppError;

// =====================================
// Prelude Module
// =====================================
/// آیتم‌های پرکاربرد
///
/// ```rust
/// use shortlink::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::database::{Database, LinkStore, SqliteLinkStore};
    pub use crate::error::{AppError, Result};
    pub use crate::models::*;
    pub use crate::services::*;
}
