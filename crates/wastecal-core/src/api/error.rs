use thiserror::Error;

use crate::resource::ResourceKind;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limited - please wait before retrying")]
    RateLimited,

    #[error("Server error ({status}): {body}")]
    ServerError { status: u16, body: String },

    #[error("Unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("A zone code is required to fetch {0}")]
    MissingScope(ResourceKind),

    #[error("Fetch did not complete: {0}")]
    Interrupted(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
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
            400 => ApiError::BadRequest(truncated),
            404 => ApiError::NotFound(truncated),
            429 => ApiError::RateLimited,
            code @ 500..=599 => ApiError::ServerError {
                status: code,
                body: truncated,
            },
            code => ApiError::UnexpectedStatus {
                status: code,
                body: truncated,
            },
        }
    }

    /// HTTP status behind this error, where one is known.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::BadRequest(_) => Some(400),
            ApiError::NotFound(_) => Some(404),
            ApiError::RateLimited => Some(429),
            ApiError::ServerError { status, .. } | ApiError::UnexpectedStatus { status, .. } => {
                Some(*status)
            }
            ApiError::Network(e) => e.status().map(|s| s.as_u16()),
            ApiError::InvalidResponse(_) | ApiError::MissingScope(_) | ApiError::Interrupted(_) => None,
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ApiError::RateLimited)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_from_status() {
        assert!(ApiError::from_status(StatusCode::TOO_MANY_REQUESTS, "").is_rate_limited());
        assert!(matches!(
            ApiError::from_status(StatusCode::BAD_REQUEST, "Invalid zone code"),
            ApiError::BadRequest(ref m) if m == "Invalid zone code"
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::NOT_FOUND, ""),
            ApiError::NotFound(_)
        ));
        assert_eq!(
            ApiError::from_status(StatusCode::BAD_GATEWAY, "").status(),
            Some(502)
        );
        assert_eq!(
            ApiError::from_status(StatusCode::IM_A_TEAPOT, "").status(),
            Some(418)
        );
    }

    #[test]
    fn test_status_absent_for_local_errors() {
        assert_eq!(ApiError::InvalidResponse("bad json".into()).status(), None);
        assert_eq!(ApiError::MissingScope(ResourceKind::Schedule).status(), None);
        assert!(!ApiError::MissingScope(ResourceKind::Schedule).is_rate_limited());
    }

    #[test]
    fn test_long_bodies_are_truncated() {
        let body = "ü".repeat(400);
        let message = ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, &body).to_string();
        assert!(message.contains("truncated, 800 total bytes"));
    }
}
