//! # Link Store
//!
//! قرارداد ذخیره‌سازی لینک‌ها (`LinkStore`) و پیاده‌سازی SQLite اون.
//!
//! دو تضمین از لایه ذخیره‌سازی انتظار میره:
//! - یکتا بودن `short_code` (با `UNIQUE` در schema)
//! - افزایش اتمیک کلیک‌ها با یک `UPDATE` واحد، بدون read-modify-write

use async_trait::async_trait;
use chrono::Utc;

use super::Database;
use crate::{
    error::{AppError, Result},
    models::{Id, ShortLink},
};

// =====================================
// LinkStore Trait
// =====================================
/// قرارداد ذخیره‌سازی ShortLink‌ها
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkStore: Send + Sync {
    /// ذخیره لینک جدید؛ `id` و `created_at` رو store تعیین میکنه
    ///
    /// # Errors
    /// `AppError::CodeCollision` اگه `short_code` قبلا استفاده شده باشه
    async fn insert(&self, original_url: &str, short_code: &str) -> Result<ShortLink>;

    /// پیدا کردن با کد کوتاه
    async fn find_by_short_code(&self, short_code: &str) -> Result<Option<ShortLink>>;

    /// پیدا کردن با شناسه
    async fn find_by_id(&self, id: &str) -> Result<Option<ShortLink>>;

    /// افزایش اتمیک شمارنده کلیک به اندازه یک
    ///
    /// # Errors
    /// `AppError::NotFound` اگه رکورد وجود نداشته باشه
    async fn increment_clicks(&self, id: &str) -> Result<()>;

    /// همه لینک‌ها، جدیدترین اول
    async fn list_all(&self) -> Result<Vec<ShortLink>>;

    /// حذف با شناسه
    ///
    /// # Errors
    /// `AppError::NotFound` اگه رکوردی حذف نشه
    async fn delete_by_id(&self, id: &str) -> Result<()>;

    /// بررسی در دسترس بودن store
    async fn ping(&self) -> Result<()>;
}

// =====================================
// SQLite Implementation
// =====================================
/// پیاده‌سازی `LinkStore` روی pool مشترک SQLite
#[derive(Debug, Clone)]
pub struct SqliteLinkStore {
    db: Database,
}

impl SqliteLinkStore {
    /// ساخت store جدید
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LinkStore for SqliteLinkStore {
    async fn insert(&self, original_url: &str, short_code: &str) -> Result<ShortLink> {
        let id = Id::new();

        let inserted = sqlx::query_as::<_, ShortLink>(
            r#"
            INSERT INTO short_links (id, short_code, original_url, clicks, created_at)
            VALUES (?, ?, ?, 0, ?)
            RETURNING id, short_code, original_url, clicks, created_at
            "#,
        )
        .bind(id.as_str())
        .bind(short_code)
        .bind(original_url)
        .bind(Utc::now())
        .fetch_one(self.db.pool())
        .await;

        match inserted {
            Ok(link) => Ok(link),
            Err(sqlx::Error::Database(err)) if err.is_unique_violation() => {
                Err(AppError::CodeCollision(short_code.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn find_by_short_code(&self, short_code: &str) -> Result<Option<ShortLink>> {
        let link = sqlx::query_as::<_, ShortLink>(
            r#"
            SELECT id, short_code, original_url, clicks, created_at
            FROM short_links
            WHERE short_code = ?
            "#,
        )
        .bind(short_code)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(link)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<ShortLink>> {
        let link = sqlx::query_as::<_, ShortLink>(
            r#"
            SELECT id, short_code, original_url, clicks, created_at
            FROM short_links
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(link)
    }

    async fn increment_clicks(&self, id: &str) -> Result<()> {
        let result = sqlx::query("UPDATE short_links SET clicks = clicks + 1 WHERE id = ?")
            .bind(id)
            .execute(self.db.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::id_not_found(id));
        }

        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<ShortLink>> {
        // rowid برای ترتیب ثابت وقتی created_at دو رکورد برابره
        let links = sqlx::query_as::<_, ShortLink>(
            r#"
            SELECT id, short_code, original_url, clicks, created_at
            FROM short_links
            ORDER BY created_at DESC, rowid DESC
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        Ok(links)
    }

    async fn delete_by_id(&self, id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM short_links WHERE id = ?")
            .bind(id)
            .execute(self.db.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::id_not_found(id));
        }

        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        self.db.health_check().await
    }
}
