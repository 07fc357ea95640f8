//! The sync gateway: load and save operations for the site collections.
//!
//! This module provides `SyncGateway`, the surface the website's UI layer
//! calls. Loads walk three storage tiers in order and never fail; saves
//! write the local cache first and then replace the repository file through
//! the contents endpoint, so a failed remote write never loses the change.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::api::ApiClient;
use crate::auth::resolve_token;
use crate::cache::CacheManager;
use crate::config::SyncConfig;
use crate::models::{Collection, CommitReceipt, DonationData, ExpenseLog};

/// Which offline tier ended up serving a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadSource {
    Cache,
    Bundled,
    Empty,
}

/// Publishes and retrieves the two site collections.
///
/// A load tries the published site, then the local cache, then the bundled
/// default, and hands back the empty shape for the collection when every
/// tier is out, so callers never see a load failure. A save serializes the
/// value once, writes it to the local cache, then verifies the token and
/// replaces the repository file (read version token, put content).
///
/// Writers are not coordinated: each save echoes back the version token it
/// just read, so of two concurrent saves to the same collection one wins
/// and the other is rejected by the version check and surfaces a conflict.
/// Callers that need more must serialize their own writes.
pub struct SyncGateway {
    config: SyncConfig,
    client: ApiClient,
    cache: CacheManager,
    token: Option<String>,
}

impl SyncGateway {
    /// Create a gateway with the cache in the platform cache directory.
    pub fn new(config: SyncConfig) -> Result<Self> {
        let cache_dir = config.cache_dir()?;
        Self::with_cache_dir(config, cache_dir)
    }

    /// Create a gateway with an explicit cache directory.
    pub fn with_cache_dir(config: SyncConfig, cache_dir: PathBuf) -> Result<Self> {
        Ok(Self {
            client: ApiClient::new()?,
            cache: CacheManager::new(cache_dir)?,
            config,
            token: None,
        })
    }

    /// Supply a write token directly instead of resolving one from the
    /// keychain or environment at save time. Loads never need it.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    // ===== Loads =====

    /// Load the donations collection. Infallible; see `SyncGateway` docs
    /// for the tier order.
    pub async fn load_donations(&self) -> DonationData {
        self.load_collection(Collection::Donations).await
    }

    /// Load the expense log. Infallible; see `SyncGateway` docs for the
    /// tier order.
    pub async fn load_expenses(&self) -> ExpenseLog {
        self.load_collection(Collection::Expenses).await
    }

    /// When the local copy of `kind` was last written, if ever.
    pub fn last_synced(&self, kind: Collection) -> Option<DateTime<Utc>> {
        self.cache.last_written(kind.cache_key())
    }

    async fn load_collection<T>(&self, kind: Collection) -> T
    where
        T: DeserializeOwned + Default,
    {
        let url = self.config.published_url(kind);
        match self.client.fetch_published(&url).await {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(value) => {
                    info!(collection = %kind, "Loaded from published site");
                    return value;
                }
                Err(e) => {
                    warn!(collection = %kind, error = %e, "Published data did not parse, trying cache");
                }
            },
            Err(e) => {
                warn!(collection = %kind, error = %e, "Published fetch failed, trying cache");
            }
        }

        self.load_local(kind).0
    }

    /// The offline half of the load ladder: cache, then bundled default,
    /// then the empty shape.
    fn load_local<T>(&self, kind: Collection) -> (T, LoadSource)
    where
        T: DeserializeOwned + Default,
    {
        match self.cache.read_text(kind.cache_key()) {
            Ok(Some(text)) => match serde_json::from_str(&text) {
                Ok(value) => {
                    info!(collection = %kind, "Loaded from local cache");
                    return (value, LoadSource::Cache);
                }
                Err(e) => {
                    warn!(collection = %kind, error = %e, "Cached entry did not parse, using bundled default");
                }
            },
            Ok(None) => {
                debug!(collection = %kind, "No cache entry, using bundled default");
            }
            Err(e) => {
                warn!(collection = %kind, error = %e, "Cache read failed, using bundled default");
            }
        }

        match serde_json::from_str(kind.bundled_json()) {
            Ok(value) => {
                info!(collection = %kind, "Loaded bundled default");
                (value, LoadSource::Bundled)
            }
            Err(e) => {
                warn!(collection = %kind, error = %e, "Bundled default did not parse, returning empty");
                (T::default(), LoadSource::Empty)
            }
        }
    }

    // ===== Saves =====

    /// Save the donations collection to the cache and the repository.
    pub async fn save_donations(&self, donations: &DonationData) -> Result<CommitReceipt> {
        let json =
            serde_json::to_string_pretty(donations).context("Failed to serialize donations")?;
        self.save_collection(Collection::Donations, &json)
            .await
            .context("Failed to save donations to GitHub")
    }

    /// Save the expense log to the cache and the repository.
    pub async fn save_expenses(&self, expenses: &ExpenseLog) -> Result<CommitReceipt> {
        let json =
            serde_json::to_string_pretty(expenses).context("Failed to serialize expenses")?;
        self.save_collection(Collection::Expenses, &json)
            .await
            .context("Failed to save expenses to GitHub")
    }

    async fn save_collection(&self, kind: Collection, json: &str) -> Result<CommitReceipt> {
        // Cache first: the change must survive locally even when every
        // remote step after this fails.
        if let Err(e) = self.cache.write_text(kind.cache_key(), json) {
            warn!(collection = %kind, error = %e, "Cache write failed, continuing with remote save");
        }

        let token = resolve_token(self.token.as_deref())?;
        let client = self.client.with_token(token);

        let identity = client
            .verify_write_access()
            .await
            .context("Token verification failed")?;
        debug!(login = %identity.login, "Write access verified");

        let file_path = self.config.file_path(kind);
        let endpoint = self.config.contents_endpoint(kind);

        let remote = client
            .fetch_contents(&endpoint, &self.config.branch)
            .await
            .with_context(|| format!("Failed to read current version of {}", file_path))?;

        let message = format!("Update {}", file_path);
        let receipt = client
            .put_contents(&endpoint, &self.config.branch, &message, json, &remote.sha)
            .await
            .with_context(|| format!("Failed to update {}", file_path))?;

        info!(
            collection = %kind,
            commit = %receipt.commit_sha,
            "Saved to repository"
        );

        Ok(receipt)
    }
}
