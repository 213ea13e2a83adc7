//! # HTTP Handlers
//!
//! هر handler فقط request رو به یه متد `LinkService` تبدیل میکنه.

pub mod link;
pub mod dashboard;
pub mod health;
