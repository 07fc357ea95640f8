//! REST API client module for GitHub.
//!
//! This module provides the `ApiClient` for reading published data files,
//! verifying tokens, and replacing repository contents.
//!
//! Reads of the published site are anonymous; repository writes use a
//! personal access token sent as a bearer token.

pub mod client;
pub mod error;

pub use client::{ApiClient, WRITE_SCOPE};
pub use error::ApiError;
