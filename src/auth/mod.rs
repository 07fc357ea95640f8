//! Credential handling for the repository write token.
//!
//! The write token never lives in source, configuration, or logs. It is
//! resolved at save time from, in order:
//!
//! 1. an explicit token handed to the gateway by the embedding application
//! 2. the OS keychain (`TokenStore`)
//! 3. the `GITHUB_TOKEN` environment variable, `.env` files included
//!
//! Loads never need a token; only the write path resolves one.

pub mod credentials;

pub use credentials::{resolve_token, TokenStore};
