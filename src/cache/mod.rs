//! Local caching module for offline data access.
//!
//! This module provides the `CacheManager` for storing and retrieving
//! collection data locally. Entries hold the exact JSON text that was last
//! saved, so a cached load reproduces the saved document byte for byte.
//!
//! Cached entries never expire: the cache is the fallback when the published
//! site is unreachable, and stale data beats no data.

pub mod manager;

pub use manager::CacheManager;
