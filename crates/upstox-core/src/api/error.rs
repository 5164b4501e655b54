use serde::Deserialize;
use thiserror::Error;

/// Upstox error code returned when an authorization code is invalid,
/// expired or already used.
pub const INVALID_AUTH_CODE: &str = "UDAPI100057";

#[derive(Error, Debug)]
pub enum ApiError {
    /// `status` is `None` when the code was rejected before any request
    #[error("Invalid authorization code: {message}")]
    InvalidAuthCode {
        status: Option<u16>,
        message: String,
    },

    #[error("Unauthorized - token may be expired")]
    Unauthorized,

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limited - please wait before retrying")]
    RateLimited,

    #[error("Server error ({status}): {reason}")]
    ServerError { status: u16, reason: String },

    #[error("Request rejected ({status}): {reason}")]
    Rejected { status: u16, reason: String },

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// `{"status": "error", "errors": [{"errorCode": "...", "message": "..."}]}`
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    errors: Vec<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default, rename = "errorCode", alias = "error_code")]
    error_code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

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
        let detail = serde_json::from_str::<ErrorEnvelope>(body)
            .ok()
            .and_then(|envelope| envelope.errors.into_iter().next());

        if let Some(ErrorDetail { error_code: Some(code), message }) = &detail {
            if code == INVALID_AUTH_CODE {
                return ApiError::InvalidAuthCode {
                    status: Some(status.as_u16()),
                    message: message.clone().unwrap_or_else(|| code.clone()),
                };
            }
        }

        let reason = detail
            .and_then(|d| d.message)
            .unwrap_or_else(|| Self::truncate_body(body));

        match status.as_u16() {
            401 => ApiError::Unauthorized,
            403 => ApiError::AccessDenied(reason),
            404 => ApiError::NotFound(reason),
            429 => ApiError::RateLimited,
            code @ 500..=599 => ApiError::ServerError {
                status: code,
                reason,
            },
            code => ApiError::Rejected { status: code, reason },
        }
    }

    /// HTTP status reported by the remote, where one is known
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::InvalidAuthCode { status, .. } => *status,
            ApiError::Rejected { status, .. } | ApiError::ServerError { status, .. } => {
                Some(*status)
            }
            ApiError::Unauthorized => Some(401),
            ApiError::AccessDenied(_) => Some(403),
            ApiError::NotFound(_) => Some(404),
            ApiError::RateLimited => Some(429),
            ApiError::NetworkError(e) => e.status().map(|s| s.as_u16()),
            ApiError::InvalidResponse(_) => None,
        }
    }

    /// Short human-readable reason, without the status prefix
    pub fn reason(&self) -> String {
        match self {
            ApiError::InvalidAuthCode { message: msg, .. }
            | ApiError::AccessDenied(msg)
            | ApiError::NotFound(msg)
            | ApiError::InvalidResponse(msg)
            | ApiError::ServerError { reason: msg, .. }
            | ApiError::Rejected { reason: msg, .. } => msg.clone(),
            ApiError::Unauthorized => "Unauthorized".to_string(),
            ApiError::RateLimited => "Too Many Requests".to_string(),
            ApiError::NetworkError(e) => e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_invalid_auth_code_is_classified_by_error_code() {
        let body = r#"{"status":"error","errors":[{"errorCode":"UDAPI100057","message":"Invalid Auth code","propertyPath":null}]}"#;
        let err = ApiError::from_status(StatusCode::BAD_REQUEST, body);
        assert!(matches!(
            err,
            ApiError::InvalidAuthCode { ref message, .. } if message == "Invalid Auth code"
        ));
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn test_invalid_auth_code_keeps_remote_status() {
        let body = r#"{"status":"error","errors":[{"errorCode":"UDAPI100057","message":"Invalid Auth code"}]}"#;
        let err = ApiError::from_status(StatusCode::UNAUTHORIZED, body);
        assert!(matches!(err, ApiError::InvalidAuthCode { .. }));
        assert_eq!(err.status(), Some(401));
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            ApiError::from_status(StatusCode::UNAUTHORIZED, ""),
            ApiError::Unauthorized
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::TOO_MANY_REQUESTS, ""),
            ApiError::RateLimited
        ));
        let server = ApiError::from_status(StatusCode::SERVICE_UNAVAILABLE, "maintenance");
        assert!(matches!(
            server,
            ApiError::ServerError { status: 503, ref reason } if reason == "maintenance"
        ));
        assert_eq!(server.status(), Some(503));
        assert!(matches!(
            ApiError::from_status(StatusCode::NOT_FOUND, "missing"),
            ApiError::NotFound(_)
        ));
    }

    #[test]
    fn test_other_status_uses_envelope_message() {
        let body = r#"{"status":"error","errors":[{"errorCode":"UDAPI1011","message":"Invalid instrument key"}]}"#;
        let err = ApiError::from_status(StatusCode::UNPROCESSABLE_ENTITY, body);
        match err {
            ApiError::Rejected { status, ref reason } => {
                assert_eq!(status, 422);
                assert_eq!(reason, "Invalid instrument key");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_long_body_is_truncated() {
        let body = "x".repeat(MAX_ERROR_BODY_LENGTH + 20);
        let err = ApiError::from_status(StatusCode::IM_A_TEAPOT, &body);
        let reason = err.reason();
        assert!(reason.contains("truncated"));
        assert!(reason.len() < body.len() + 40);
    }
}
