use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Unauthorized,
    Forbidden,
    NotFound,
    Validation,
    RateLimited,
    Internal,
}

impl ErrorCode {
    /// Classifies an HTTP status from the REST backend. 406 is how a
    /// PostgREST-style API reports "no row matched" on single-object reads.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => ErrorCode::Unauthorized,
            403 => ErrorCode::Forbidden,
            404 | 406 => ErrorCode::NotFound,
            400 | 409 | 422 => ErrorCode::Validation,
            429 => ErrorCode::RateLimited,
            _ => ErrorCode::Internal,
        }
    }

    pub fn is_auth(self) -> bool {
        matches!(self, ErrorCode::Unauthorized | ErrorCode::Forbidden)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
#[error("{code:?}: {message}")]
pub struct ApiException {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiException {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        Self::new(ErrorCode::from_status(status), message)
    }
}

impl From<ApiException> for ApiError {
    fn from(value: ApiException) -> Self {
        Self {
            code: value.code,
            message: value.message,
        }
    }
}

/// Error body shape served by the REST backend. Every field is optional in
/// practice, so the decode never fails on a terse response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BackendErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub hint: Option<String>,
}

impl BackendErrorBody {
    /// Most specific human-readable line available.
    pub fn summary(&self) -> Option<&str> {
        self.message
            .as_deref()
            .or(self.details.as_deref())
            .or(self.hint.as_deref())
            .filter(|s| !s.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_backend_statuses_to_codes() {
        assert_eq!(ErrorCode::from_status(401), ErrorCode::Unauthorized);
        assert_eq!(ErrorCode::from_status(406), ErrorCode::NotFound);
        assert_eq!(ErrorCode::from_status(422), ErrorCode::Validation);
        assert_eq!(ErrorCode::from_status(500), ErrorCode::Internal);
        assert!(ErrorCode::from_status(403).is_auth());
        assert!(!ErrorCode::from_status(429).is_auth());
    }

    #[test]
    fn error_body_summary_prefers_message() {
        let body: BackendErrorBody = serde_json::from_str(
            r#"{"message":"permission denied for table nhan_su","hint":"check RLS"}"#,
        )
        .expect("decode error body");
        assert_eq!(body.summary(), Some("permission denied for table nhan_su"));

        let empty: BackendErrorBody = serde_json::from_str("{}").expect("decode empty body");
        assert_eq!(empty.summary(), None);
    }
}
