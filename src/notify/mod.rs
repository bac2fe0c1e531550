// src/notify/mod.rs
//! Notification side: digest composition and delivery.

pub mod digest;
pub mod email;

use anyhow::Result;
use chrono::NaiveDate;

use crate::record::MenuRecord;

pub use email::EmailSender;

/// Delivers the terminal set of menu records.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn send_digest(&self, records: &[MenuRecord], today: NaiveDate) -> Result<()>;
}
