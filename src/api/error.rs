use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Unauthorized - token is invalid or expired")]
    Unauthorized,

    #[error("Token is missing the required \"repo\" scope (granted: {granted})")]
    MissingScope { granted: String },

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Remote file changed since it was last read: {0}")]
    Conflict(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            // The byte limit can land inside a multi-byte character; back
            // up to the nearest boundary before slicing.
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
        }
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let truncated = Self::truncate_body(body);
        match status.as_u16() {
            401 => ApiError::Unauthorized,
            403 => ApiError::AccessDenied(truncated),
            404 => ApiError::NotFound(truncated),
            // The contents API reports a stale version token as 409, but some
            // validation paths surface the same situation as 422.
            409 | 422 => ApiError::Conflict(truncated),
            500..=599 => ApiError::ServerError(truncated),
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, truncated)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_from_status_mapping() {
        assert!(matches!(
            ApiError::from_status(StatusCode::UNAUTHORIZED, ""),
            ApiError::Unauthorized
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::FORBIDDEN, "nope"),
            ApiError::AccessDenied(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::NOT_FOUND, "missing"),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::CONFLICT, "sha mismatch"),
            ApiError::Conflict(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::UNPROCESSABLE_ENTITY, "sha mismatch"),
            ApiError::Conflict(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "boom"),
            ApiError::ServerError(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::IM_A_TEAPOT, "?"),
            ApiError::InvalidResponse(_)
        ));
    }

    #[test]
    fn test_long_body_is_truncated() {
        let body = "x".repeat(2000);
        match ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, &body) {
            ApiError::ServerError(msg) => {
                assert!(msg.contains("truncated"));
                assert!(msg.contains("2000 total bytes"));
                assert!(msg.len() < body.len());
            }
            other => panic!("unexpected error kind: {:?}", other),
        }
    }

    #[test]
    fn test_truncation_lands_on_character_boundary() {
        // 200 three-byte characters: the 500-byte limit falls inside one,
        // so the cut must back up to a whole character.
        let body = "€".repeat(200);
        match ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, &body) {
            ApiError::ServerError(msg) => {
                assert!(msg.starts_with('€'));
                assert_eq!(msg.chars().filter(|&c| c == '€').count(), 166);
                assert!(msg.contains("600 total bytes"));
            }
            other => panic!("unexpected error kind: {:?}", other),
        }
    }

    #[test]
    fn test_short_body_kept_verbatim() {
        match ApiError::from_status(StatusCode::NOT_FOUND, "no such file") {
            ApiError::NotFound(msg) => assert_eq!(msg, "no such file"),
            other => panic!("unexpected error kind: {:?}", other),
        }
    }
}
