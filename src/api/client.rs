//! API client for communicating with the GitHub REST API.
//!
//! This module provides the `ApiClient` struct for reading and replacing
//! repository file contents, verifying tokens, and fetching the published
//! copies of synced files.

use std::time::Duration;

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::{header, Client};
use serde::Deserialize;
use tracing::debug;

use crate::models::{CommitReceipt, RemoteFile, TokenIdentity};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Base URL for the GitHub REST API.
const API_BASE_URL: &str = "https://api.github.com";

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Media type GitHub asks clients to request.
const GITHUB_ACCEPT: &str = "application/vnd.github+json";

/// REST API version pin sent with every API request.
const GITHUB_API_VERSION: &str = "2022-11-28";

/// Response header listing the OAuth scopes granted to a classic token.
/// Fine-grained tokens omit the header entirely.
const SCOPES_HEADER: &str = "x-oauth-scopes";

/// Scope a token must carry before we attempt a repository write.
pub const WRITE_SCOPE: &str = "repo";

/// User agent for all outgoing requests. GitHub rejects requests without one.
const USER_AGENT: &str = concat!("givesync/", env!("CARGO_PKG_VERSION"));

/// API client for GitHub.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    token: Option<String>,
}

impl ApiClient {
    /// Create a new API client
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            token: None,
        })
    }

    /// Create a new ApiClient with the given token, sharing the connection pool.
    /// This is more efficient than creating a new client for each request.
    pub fn with_token(&self, token: String) -> Self {
        Self {
            client: self.client.clone(), // Cheap clone, shares connection pool
            token: Some(token),
        }
    }

    fn auth_headers(&self) -> Result<header::HeaderMap> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static(GITHUB_ACCEPT),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            header::HeaderValue::from_static(GITHUB_API_VERSION),
        );
        if let Some(ref token) = self.token {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {}", token))?,
            );
        }
        Ok(headers)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    // ===== Published site =====

    /// Fetch a published JSON document from the public site.
    ///
    /// The published copy lives on plain static hosting, so this sends no
    /// auth or API headers and needs no token.
    pub async fn fetch_published(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to send GET request to {}", url))?;

        let response = Self::check_response(response).await?;

        response
            .text()
            .await
            .with_context(|| format!("Failed to read response body from {}", url))
    }

    // ===== Token verification =====

    /// Fetch the identity and granted scopes behind the configured token.
    pub async fn verify_token(&self) -> Result<TokenIdentity> {
        let url = format!("{}/user", API_BASE_URL);

        let response = self
            .client
            .get(&url)
            .headers(self.auth_headers()?)
            .send()
            .await
            .context("Failed to send token verification request")?;

        // Scopes ride on a response header; read them before the body moves.
        let scopes = response
            .headers()
            .get(SCOPES_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(parse_scope_header)
            .unwrap_or_default();

        let response = Self::check_response(response).await?;

        let user: UserResponse = response
            .json()
            .await
            .context("Failed to parse user response")?;

        debug!(login = %user.login, scopes = ?scopes, "Token verified");

        Ok(TokenIdentity {
            login: user.login,
            scopes,
        })
    }

    /// Verify the token and require the scope repository writes need.
    ///
    /// Fine-grained tokens never report scopes, so they are rejected here
    /// even when their repository permissions would allow the write.
    pub async fn verify_write_access(&self) -> Result<TokenIdentity> {
        let identity = self.verify_token().await?;
        if !identity.has_scope(WRITE_SCOPE) {
            return Err(ApiError::MissingScope {
                granted: identity.scopes.join(", "),
            }
            .into());
        }
        Ok(identity)
    }

    // ===== Repository contents =====

    /// Fetch a file from the repository contents endpoint.
    ///
    /// The returned `sha` is the version token a subsequent write must echo
    /// back. A file missing from the branch surfaces as `ApiError::NotFound`.
    pub async fn fetch_contents(&self, endpoint: &str, branch: &str) -> Result<RemoteFile> {
        let url = format!("{}{}?ref={}", API_BASE_URL, endpoint, branch);

        let response = self
            .client
            .get(&url)
            .headers(self.auth_headers()?)
            .send()
            .await
            .with_context(|| format!("Failed to send GET request to {}", url))?;

        let response = Self::check_response(response).await?;

        let raw: ContentsApiResponse = response
            .json()
            .await
            .with_context(|| format!("Failed to parse contents response from {}", url))?;

        raw.into_remote_file()
    }

    /// Replace a file through the contents endpoint.
    ///
    /// `sha` is the version token from a prior fetch. A stale token makes
    /// the API refuse the write, which surfaces as `ApiError::Conflict`.
    pub async fn put_contents(
        &self,
        endpoint: &str,
        branch: &str,
        message: &str,
        content: &str,
        sha: &str,
    ) -> Result<CommitReceipt> {
        let url = format!("{}{}", API_BASE_URL, endpoint);

        let body = serde_json::json!({
            "message": message,
            "content": BASE64.encode(content.as_bytes()),
            "sha": sha,
            "branch": branch,
        });

        let response = self
            .client
            .put(&url)
            .headers(self.auth_headers()?)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("Failed to send PUT request to {}", url))?;

        let response = Self::check_response(response).await?;

        let raw: PutContentsApiResponse = response
            .json()
            .await
            .with_context(|| format!("Failed to parse commit response from {}", url))?;

        debug!(
            endpoint = endpoint,
            commit = %raw.commit.sha,
            "Contents replaced"
        );

        Ok(CommitReceipt {
            content_sha: raw.content.sha,
            commit_sha: raw.commit.sha,
        })
    }
}

/// Split the scopes header into individual scope names.
fn parse_scope_header(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|scope| !scope.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Decode file content from the contents endpoint.
/// The API wraps base64 in newlines, so whitespace is stripped first.
fn decode_content(encoded: &str) -> Result<String> {
    let stripped: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = BASE64
        .decode(stripped.as_bytes())
        .context("Failed to decode file content as base64")?;
    String::from_utf8(bytes).context("Decoded file content is not valid UTF-8")
}

// Internal API response types for parsing

#[derive(Debug, Clone, Deserialize)]
struct UserResponse {
    login: String,
}

#[derive(Debug, Clone, Deserialize)]
struct ContentsApiResponse {
    path: String,
    sha: String,
    #[serde(default)]
    size: u64,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    encoding: Option<String>,
}

impl ContentsApiResponse {
    fn into_remote_file(self) -> Result<RemoteFile> {
        // Large files come back with no inline content; the sha is still
        // everything a writer needs.
        let content = match (self.content.as_deref(), self.encoding.as_deref()) {
            (Some(encoded), Some("base64")) => Some(decode_content(encoded)?),
            _ => None,
        };

        Ok(RemoteFile {
            path: self.path,
            sha: self.sha,
            size: self.size,
            content,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
struct PutContentsApiResponse {
    content: ObjectSha,
    commit: ObjectSha,
}

#[derive(Debug, Clone, Deserialize)]
struct ObjectSha {
    sha: String,
}
