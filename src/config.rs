//! Sync configuration management.
//!
//! This module handles the identifiers that tell the gateway where the data
//! files live: repository owner, name, branch, and the per-collection file
//! paths. The defaults reproduce the production deployment, so a plain
//! `SyncConfig::default()` targets the live site.
//!
//! Configuration is stored at `~/.config/givesync/config.json`. The write
//! token is never part of the configuration; see `auth::credentials`.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::models::Collection;

/// Application name used for config/cache directory paths
const APP_NAME: &str = "givesync";

/// Config file name
const CONFIG_FILE: &str = "config.json";

// Production deployment identifiers.
const DEFAULT_OWNER: &str = "sayprob";
const DEFAULT_REPO: &str = "website-for-yassin";
const DEFAULT_BRANCH: &str = "main";
const DEFAULT_DONATIONS_PATH: &str = "src/data/donations.json";
const DEFAULT_EXPENSES_PATH: &str = "src/data/expenses.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Account that owns the hosting repository.
    pub owner: String,
    /// Repository holding the site and its data files.
    pub repo: String,
    /// Branch writes are committed to.
    pub branch: String,
    /// Repo-relative path of the donations file.
    pub donations_path: String,
    /// Repo-relative path of the expenses file.
    pub expenses_path: String,
    /// Base URL of the published site, when it is not served from the
    /// default `https://{owner}.github.io/{repo}` location.
    #[serde(default)]
    pub published_base: Option<String>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            owner: DEFAULT_OWNER.to_string(),
            repo: DEFAULT_REPO.to_string(),
            branch: DEFAULT_BRANCH.to_string(),
            donations_path: DEFAULT_DONATIONS_PATH.to_string(),
            expenses_path: DEFAULT_EXPENSES_PATH.to_string(),
            published_base: None,
        }
    }
}

impl SyncConfig {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Cache directory for this deployment, scoped by owner and repo so two
    /// configured sites never share entries.
    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;

        Ok(cache_dir
            .join(APP_NAME)
            .join(sanitize_name(&self.owner))
            .join(sanitize_name(&self.repo)))
    }

    /// Repo-relative path of a collection's data file.
    pub fn file_path(&self, kind: Collection) -> &str {
        match kind {
            Collection::Donations => &self.donations_path,
            Collection::Expenses => &self.expenses_path,
        }
    }

    /// Public URL serving the latest published copy of a collection.
    pub fn published_url(&self, kind: Collection) -> String {
        match &self.published_base {
            Some(base) => format!("{}/{}", base.trim_end_matches('/'), self.file_path(kind)),
            None => format!(
                "https://{}.github.io/{}/{}",
                self.owner,
                self.repo,
                self.file_path(kind)
            ),
        }
    }

    /// API endpoint (path only) for a collection's file in the repository.
    pub fn contents_endpoint(&self, kind: Collection) -> String {
        format!(
            "/repos/{}/{}/contents/{}",
            self.owner,
            self.repo,
            self.file_path(kind)
        )
    }
}

/// Make a repository identifier safe to use as a directory name.
/// Anything outside the character set GitHub allows becomes an underscore.
fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_target_production() {
        let config = SyncConfig::default();
        assert_eq!(config.owner, "sayprob");
        assert_eq!(config.repo, "website-for-yassin");
        assert_eq!(config.branch, "main");
        assert_eq!(
            config.published_url(Collection::Donations),
            "https://sayprob.github.io/website-for-yassin/src/data/donations.json"
        );
        assert_eq!(
            config.published_url(Collection::Expenses),
            "https://sayprob.github.io/website-for-yassin/src/data/expenses.json"
        );
    }

    #[test]
    fn test_contents_endpoints() {
        let config = SyncConfig::default();
        assert_eq!(
            config.contents_endpoint(Collection::Donations),
            "/repos/sayprob/website-for-yassin/contents/src/data/donations.json"
        );
        assert_eq!(
            config.contents_endpoint(Collection::Expenses),
            "/repos/sayprob/website-for-yassin/contents/src/data/expenses.json"
        );
    }

    #[test]
    fn test_published_base_override() {
        let config = SyncConfig {
            published_base: Some("https://donations.example.org/".to_string()),
            ..SyncConfig::default()
        };
        assert_eq!(
            config.published_url(Collection::Donations),
            "https://donations.example.org/src/data/donations.json"
        );
    }

    #[test]
    fn test_config_round_trips() {
        let config = SyncConfig {
            owner: "someone".to_string(),
            branch: "data".to_string(),
            ..SyncConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: SyncConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.owner, "someone");
        assert_eq!(back.branch, "data");
        assert_eq!(back.expenses_path, "src/data/expenses.json");
    }

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("website-for-yassin"), "website-for-yassin");
        assert_eq!(sanitize_name("v2.data_store"), "v2.data_store");
        assert_eq!(sanitize_name("owner/evil"), "owner_evil");
        assert_eq!(sanitize_name("a:b"), "a_b");
    }
}
