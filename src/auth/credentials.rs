use anyhow::{Context, Result};
use keyring::Entry;

const SERVICE_NAME: &str = "givesync";

/// Keychain account under which the write token is filed
const TOKEN_ACCOUNT: &str = "github-token";

/// Environment variable consulted when nothing else supplies a token
const TOKEN_ENV_VAR: &str = "GITHUB_TOKEN";

pub struct TokenStore;

impl TokenStore {
    /// Store the repository write token in the OS keychain
    pub fn store(token: &str) -> Result<()> {
        let entry =
            Entry::new(SERVICE_NAME, TOKEN_ACCOUNT).context("Failed to create keyring entry")?;
        entry
            .set_password(token)
            .context("Failed to store token in keychain")?;
        Ok(())
    }

    /// Retrieve the write token from the OS keychain
    pub fn get() -> Result<String> {
        let entry =
            Entry::new(SERVICE_NAME, TOKEN_ACCOUNT).context("Failed to create keyring entry")?;
        entry
            .get_password()
            .context("Failed to retrieve token from keychain")
    }

    /// Delete the stored write token
    pub fn delete() -> Result<()> {
        let entry =
            Entry::new(SERVICE_NAME, TOKEN_ACCOUNT).context("Failed to create keyring entry")?;
        entry
            .delete_credential()
            .context("Failed to delete token from keychain")?;
        Ok(())
    }

    /// Check if a token is stored in the keychain
    pub fn is_present() -> bool {
        if let Ok(entry) = Entry::new(SERVICE_NAME, TOKEN_ACCOUNT) {
            entry.get_password().is_ok()
        } else {
            false
        }
    }
}

/// Resolve the repository write token.
///
/// An explicitly supplied token wins; otherwise the OS keychain is tried,
/// then the `GITHUB_TOKEN` environment variable (with `.env` files honored).
/// A blank value from any source is skipped, never used as a credential.
/// The token never lives in source or configuration files.
pub fn resolve_token(explicit: Option<&str>) -> Result<String> {
    if let Some(token) = explicit {
        if !token.is_empty() {
            return Ok(token.to_string());
        }
    }

    if let Ok(token) = TokenStore::get() {
        if !token.is_empty() {
            return Ok(token);
        }
    }

    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();
    std::env::var(TOKEN_ENV_VAR)
        .ok()
        .filter(|token| !token.is_empty())
        .with_context(|| {
            format!(
                "No write token available: pass one explicitly, store one in the keychain, or set {}",
                TOKEN_ENV_VAR
            )
        })
}
