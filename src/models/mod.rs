//! # ماژول مدل‌ها (Domain Models)
//!
//! - **Entity**: `ShortLink` که مستقیم از دیتابیس خونده میشه
//! - **DTO**: درخواست‌ها و پاسخ‌های API

mod link;
mod dto;

pub use link::*;
pub use dto::*;

use serde::{Deserialize, Serialize};

// =====================================
// Common Types (Newtype Pattern)
// =====================================
/// شناسه یکتای لینک
///
/// شناسه‌ها رو store موقع insert میسازه (nanoid با ۲۱ کاراکتر).
///
/// ```rust
/// use shortlink::models::Id;
///
/// let id = Id::new();
/// assert!(Id::is_well_formed(id.as_str()));
/// assert!(!Id::is_well_formed("../etc/passwd"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id(String);

impl Id {
    /// طول شناسه‌های تولیدی
    pub const LENGTH: usize = 21;

    /// ساخت ID جدید
    #[must_use]
    pub fn new() -> Self {
        Self(nanoid::format(
            nanoid::rngs::default,
            &nanoid::alphabet::SAFE,
            Self::LENGTH,
        ))
    }

    /// آیا رشته شکل یه شناسه معتبر رو داره؟
    ///
    /// الفبای پیش‌فرض nanoid: حروف، اعداد، `_` و `-`.
    #[must_use]
    pub fn is_well_formed(s: &str) -> bool {
        s.len() == Self::LENGTH
            && s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Id {
    fn default() -> Self {
        Self::new()
    }
}
