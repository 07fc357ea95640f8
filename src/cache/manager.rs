use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::models::{Collection, DonationData, ExpenseLog};

/// String-keyed store of JSON text on the local filesystem.
///
/// Each key maps to one `<key>.json` file holding exactly the bytes that
/// were written. There is no metadata envelope, so the cached value is the
/// same serialized document the UI saved and a later load parses it back
/// unchanged.
pub struct CacheManager {
    cache_dir: PathBuf,
}

impl CacheManager {
    pub fn new(cache_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&cache_dir)
            .with_context(|| format!("Failed to create cache directory {}", cache_dir.display()))?;
        Ok(Self { cache_dir })
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", key))
    }

    /// Raw JSON text stored under `key`, if any.
    pub fn read_text(&self, key: &str) -> Result<Option<String>> {
        let path = self.entry_path(key);
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read cache entry: {}", key))?;
        Ok(Some(contents))
    }

    /// Store `json` under `key` exactly as given.
    ///
    /// Written atomically via temp file + rename so a crash mid-write never
    /// leaves a half-written entry behind.
    pub fn write_text(&self, key: &str, json: &str) -> Result<()> {
        let path = self.entry_path(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let temp_path = path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path)
            .with_context(|| format!("Failed to create cache file for: {}", key))?;
        file.write_all(json.as_bytes())
            .with_context(|| format!("Failed to write cache entry: {}", key))?;
        file.sync_all()?;
        fs::rename(&temp_path, &path)
            .with_context(|| format!("Failed to finalize cache entry: {}", key))?;

        debug!(key = key, bytes = json.len(), "Cache entry written");
        Ok(())
    }

    /// When the entry under `key` was last written, if it exists.
    pub fn last_written(&self, key: &str) -> Option<DateTime<Utc>> {
        let modified = fs::metadata(self.entry_path(key)).ok()?.modified().ok()?;
        Some(DateTime::from(modified))
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.read_text(key)? {
            Some(text) => {
                let value = serde_json::from_str(&text)
                    .with_context(|| format!("Failed to parse cache entry: {}", key))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    fn store<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)
            .with_context(|| format!("Failed to serialize cache entry: {}", key))?;
        self.write_text(key, &json)
    }

    // ===== Donations =====

    pub fn load_donations(&self) -> Result<Option<DonationData>> {
        self.load(Collection::Donations.cache_key())
    }

    pub fn store_donations(&self, donations: &DonationData) -> Result<()> {
        self.store(Collection::Donations.cache_key(), donations)
    }

    // ===== Expenses =====

    pub fn load_expenses(&self) -> Result<Option<ExpenseLog>> {
        self.load(Collection::Expenses.cache_key())
    }

    pub fn store_expenses(&self, expenses: &ExpenseLog) -> Result<()> {
        self.store(Collection::Expenses.cache_key(), expenses)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn temp_cache() -> (TempDir, CacheManager) {
        let dir = TempDir::new().unwrap();
        let cache = CacheManager::new(dir.path().to_path_buf()).unwrap();
        (dir, cache)
    }

    #[test]
    fn test_write_then_read_is_exact() {
        let (_dir, cache) = temp_cache();
        let text = "{\n  \"alice\": {\n    \"amount\": 50\n  }\n}";

        cache.write_text("donations", text).unwrap();
        assert_eq!(cache.read_text("donations").unwrap().as_deref(), Some(text));
    }

    #[test]
    fn test_read_missing_key() {
        let (_dir, cache) = temp_cache();
        assert!(cache.read_text("donations").unwrap().is_none());
        assert!(cache.load_donations().unwrap().is_none());
    }

    #[test]
    fn test_store_writes_pretty_json() {
        let (dir, cache) = temp_cache();

        let mut donations = DonationData::new();
        donations.insert("alice", json!({"amount": 50}));
        cache.store_donations(&donations).unwrap();

        let on_disk =
            std::fs::read_to_string(dir.path().join("donations.json")).unwrap();
        assert_eq!(on_disk, "{\n  \"alice\": {\n    \"amount\": 50\n  }\n}");
    }

    #[test]
    fn test_typed_round_trip() {
        let (_dir, cache) = temp_cache();

        let mut expenses = ExpenseLog::new();
        expenses.push(json!({"amount": 30, "description": "rice"}));
        cache.store_expenses(&expenses).unwrap();

        let loaded = cache.load_expenses().unwrap().unwrap();
        assert_eq!(loaded, expenses);
    }

    #[test]
    fn test_malformed_entry_is_a_parse_error() {
        let (_dir, cache) = temp_cache();
        cache.write_text("donations", "{not json").unwrap();

        // Raw reads still succeed; the typed load reports the parse failure.
        assert!(cache.read_text("donations").unwrap().is_some());
        assert!(cache.load_donations().is_err());
    }

    #[test]
    fn test_overwrite_replaces_entry() {
        let (_dir, cache) = temp_cache();
        cache.write_text("expenses", "[]").unwrap();
        cache.write_text("expenses", "[1]").unwrap();
        assert_eq!(cache.read_text("expenses").unwrap().as_deref(), Some("[1]"));
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let (dir, cache) = temp_cache();
        cache.write_text("donations", "{}").unwrap();
        assert!(!dir.path().join("donations.tmp").exists());
        assert!(dir.path().join("donations.json").exists());
    }

    #[test]
    fn test_last_written() {
        let (_dir, cache) = temp_cache();
        assert!(cache.last_written("donations").is_none());

        cache.write_text("donations", "{}").unwrap();
        let written = cache.last_written("donations").unwrap();
        assert!((Utc::now() - written).num_seconds() < 5);
    }
}
