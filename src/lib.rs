//! Offline-tolerant persistence for a charity site's donation and expense
//! records.
//!
//! The site publishes its data as JSON files inside the repository that
//! hosts it. This crate loads those collections for display and writes
//! changes back. A load tries the published site, then the local cache,
//! then a bundled default, and never fails; a save lands in the local cache
//! first and then replaces the repository file through the GitHub contents
//! endpoint, so a failed remote write never loses the change.
//!
//! The embedding application drives everything through `SyncGateway`.
//! Write tokens are never part of configuration or source; they come from
//! the caller, the OS keychain, or the `GITHUB_TOKEN` environment variable
//! (see the `auth` module).

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod gateway;
pub mod models;

pub use api::{ApiClient, ApiError};
pub use cache::CacheManager;
pub use config::SyncConfig;
pub use gateway::SyncGateway;
pub use models::{Collection, CommitReceipt, DonationData, ExpenseLog, RemoteFile, TokenIdentity};
