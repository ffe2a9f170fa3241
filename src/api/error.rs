//! API client error types
//!
//! Errors raised while talking to the Mealwise backend, including the
//! client-side order transition check.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use crate::models::OrderStatus;

/// Errors that can occur when calling the backend
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Backend unavailable")]
    Unavailable,

    #[error("Request timeout")]
    Timeout,

    #[error("Request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// 401 or 403 from the backend
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("API error {status}: {message}")]
    Status { status: u16, message: String },

    /// Response body did not match the expected shape
    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Not logged in")]
    NotAuthenticated,

    #[error("Cannot {action} an order that is {from}")]
    InvalidTransition { from: OrderStatus, action: &'static str },
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ApiError::Timeout
        } else if e.is_connect() {
            ApiError::Unavailable
        } else if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Request(e)
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}

impl ApiError {
    /// Build the error for a non-success response from its status and body
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let message = error_message(status, body);

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Unauthorized(message),
            StatusCode::NOT_FOUND => ApiError::NotFound(message),
            StatusCode::TOO_MANY_REQUESTS => ApiError::RateLimited,
            _ => ApiError::Status {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// Whether signing in again could fix this error
    pub fn is_auth(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_) | ApiError::NotAuthenticated)
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

/// Pick the most useful message out of an error body
///
/// Prefers `message`, then `error` (string or `{ message }`), then the raw
/// text, then the status reason phrase.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        if let Some(msg) = parsed.message.filter(|m| !m.is_empty()) {
            return msg;
        }
        match parsed.error {
            Some(serde_json::Value::String(s)) if !s.is_empty() => return s,
            Some(serde_json::Value::Object(obj)) => {
                if let Some(serde_json::Value::String(s)) = obj.get("message") {
                    return s.clone();
                }
            }
            _ => {}
        }
    }

    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }

    status
        .canonical_reason()
        .unwrap_or("Unknown error")
        .to_string()
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_field_wins() {
        let err = ApiError::from_response(
            StatusCode::BAD_REQUEST,
            r#"{"message": "Email already registered", "error": "Bad Request"}"#,
        );
        assert_eq!(err.to_string(), "API error 400: Email already registered");
    }

    #[test]
    fn test_nested_error_message() {
        let err = ApiError::from_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"error": {"code": "VALIDATION", "message": "price must be positive"}}"#,
        );
        assert!(matches!(err, ApiError::Status { status: 422, ref message } if message == "price must be positive"));
    }

    #[test]
    fn test_plain_text_and_empty_bodies() {
        let err = ApiError::from_response(StatusCode::BAD_GATEWAY, "upstream down");
        assert_eq!(err.to_string(), "API error 502: upstream down");

        let err = ApiError::from_response(StatusCode::INTERNAL_SERVER_ERROR, "");
        assert_eq!(err.to_string(), "API error 500: Internal Server Error");
    }

    #[test]
    fn test_object_without_message_uses_raw_body() {
        let err = ApiError::from_response(StatusCode::BAD_REQUEST, r#"{"code": "E_STOCK"}"#);
        assert_eq!(err.to_string(), r#"API error 400: {"code": "E_STOCK"}"#);
    }

    #[test]
    fn test_status_classification() {
        assert!(ApiError::from_response(StatusCode::UNAUTHORIZED, "{}").is_auth());
        assert!(ApiError::from_response(StatusCode::FORBIDDEN, "{}").is_auth());
        assert!(matches!(
            ApiError::from_response(StatusCode::NOT_FOUND, r#"{"error": "Order not found"}"#),
            ApiError::NotFound(ref m) if m == "Order not found"
        ));
        assert!(matches!(
            ApiError::from_response(StatusCode::TOO_MANY_REQUESTS, ""),
            ApiError::RateLimited
        ));
    }

    #[test]
    fn test_transition_display() {
        let err = ApiError::InvalidTransition {
            from: OrderStatus::Archived,
            action: "cancel",
        };
        assert_eq!(err.to_string(), "Cannot cancel an order that is Archived");
    }
}
