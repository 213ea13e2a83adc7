//! # ماژول دیتابیس (Database Layer)
//!
//! Connection pool برای SQLite و پیاده‌سازی `LinkStore` روی اون.
//!
//! یه `Database` موقع startup ساخته میشه، با clone شدن (فقط Arc) بین
//! handler‌ها share میشه و موقع shutdown با `close` بسته میشه.

mod repository;

pub use repository::*;

use std::sync::Arc;
use std::time::Duration;

use sqlx::{
    migrate::Migrator,
    sqlite::{SqlitePool, SqlitePoolOptions},
};
use tracing::info;

use crate::error::Result;

// مسیر migration‌ها
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

// =====================================
// Database Connection
// =====================================
/// اتصال به دیتابیس با Connection Pool
#[derive(Debug, Clone)]
pub struct Database {
    pool: Arc<SqlitePool>,
}

impl Database {
    /// اتصال به دیتابیس
    ///
    /// # Arguments
    /// * `database_url` - آدرس دیتابیس (مثلا `sqlite://data/links.db?mode=rwc`)
    /// * `max_connections` - حداکثر اتصال‌های همزمان
    ///
    /// # Errors
    /// خطا برمیگردونه اگه پوشه دیتابیس ساخته نشه یا اتصال برقرار نشه
    pub async fn connect(database_url: impl AsRef<str>, max_connections: u32) -> Result<Self> {
        let url = database_url.as_ref();

        // ساخت پوشه فایل دیتابیس اگه وجود نداره
        if let Some(path) = url.strip_prefix("sqlite://") {
            let path = path.split('?').next().unwrap_or(path);
            if let Some(parent) = std::path::Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .min_connections(1)
            .acquire_timeout(Duration::from_secs(5))
            .idle_timeout(Duration::from_secs(600))
            .connect(url)
            .await?;

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// دیتابیس موقت در RAM با schema کامل
    ///
    /// فقط یه اتصال داره و هیچوقت recycle نمیشه، چون با بسته شدن
    /// آخرین اتصال کل داده‌ها از بین میره.
    ///
    /// # Errors
    /// اگه اتصال یا migration شکست بخوره
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;

        let db = Self {
            pool: Arc::new(pool),
        };

        db.migrate().await?;
        Ok(db)
    }

    /// اجرای migration‌ها
    ///
    /// # Errors
    /// اگه یکی از migration‌ها اجرا نشه
    pub async fn migrate(&self) -> Result<()> {
        MIGRATOR.run(&*self.pool).await?;
        Ok(())
    }

    /// دسترسی به pool
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// بررسی سلامت دیتابیس
    ///
    /// # Errors
    /// اگه query ساده `SELECT 1` اجرا نشه
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&*self.pool).await?;
        Ok(())
    }

    /// بستن همه اتصال‌ها (موقع shutdown)
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database pool closed");
    }
}
