//! # ماژول سرویس‌ها (Business Logic Layer)
//!
//! ```text
//! ┌─────────────────┐
//! │    API Layer    │  <-- HTTP handlers (axum)
//! ├─────────────────┤
//! │  Service Layer  │  <-- LinkService
//! ├─────────────────┤
//! │   Link Store    │  <-- LinkStore trait
//! ├─────────────────┤
//! │    Database     │  <-- SQLite pool
//! └─────────────────┘
//! ```

mod link_service;

pub use link_service::*;

use std::sync::Arc;

use crate::{
    config::Config,
    database::{Database, LinkStore, SqliteLinkStore},
};

// =====================================
// Application State
// =====================================
/// وضعیت مشترک بین همه handler‌ها
///
/// همه فیلدها پشت `Arc` هستن و clone کردنش ارزونه.
#[derive(Clone)]
pub struct AppState {
    /// تنظیمات برنامه
    pub config: Arc<Config>,

    /// سرویس لینک
    pub link_service: Arc<LinkService>,
}

impl AppState {
    /// ساخت state روی دیتابیس SQLite
    #[must_use]
    pub fn new(db: Database, config: Config) -> Self {
        Self::with_store(Arc::new(SqliteLinkStore::new(db)), config)
    }

    /// ساخت state روی هر پیاده‌سازی از `LinkStore`
    #[must_use]
    pub fn with_store(store: Arc<dyn LinkStore>, config: Config) -> Self {
        let config = Arc::new(config);
        let link_service = Arc::new(LinkService::new(store, &config));

        Self {
            config,
            link_service,
        }
    }
}
