//! Data models for the synced charity records.
//!
//! This module contains the data structures the gateway moves between the
//! website UI, the local cache, and the hosting repository:
//!
//! - `DonationData`: donations keyed by donor identifier
//! - `ExpenseLog`: the chronological expense list
//! - `Collection`: names the two synced datasets
//! - `RemoteFile`, `CommitReceipt`, `TokenIdentity`: remote-side state
//!
//! Donation and expense records are opaque JSON owned by the UI; models here
//! never re-shape them, so whatever was saved parses back identically.

pub mod collection;
pub mod donation;
pub mod expense;
pub mod remote;

pub use collection::Collection;
pub use donation::DonationData;
pub use expense::ExpenseLog;
pub use remote::{CommitReceipt, RemoteFile, TokenIdentity};

use serde_json::Value;

/// Numeric `amount` field carried by a record, if any.
pub(crate) fn record_amount(record: &Value) -> Option<f64> {
    record.get("amount").and_then(Value::as_f64)
}
