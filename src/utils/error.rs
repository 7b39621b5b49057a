//! Error handling.

use serde_json::Value;
use std::fmt;

/// Everything that can go wrong between a user action and the server's answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The request never produced an HTTP response.
    Network(String),
    /// The server answered with a non-success status.
    Rejected { status: u16, message: String },
    /// The credential is missing, expired or was refused.
    Unauthorized(String),
    /// A client-side check failed and no request was sent.
    Invalid(String),
    /// The response body did not have the expected shape.
    Decode(String),
    /// The persisted credential could not be read or written.
    Storage(String),
}

impl ApiError {
    /// Builds an error from a non-success HTTP status and its raw body.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = server_message(body)
            .unwrap_or_else(|| format!("Request failed with status {status}"));

        match status {
            401 | 422 => Self::Unauthorized(message),
            _ => Self::Rejected { status, message },
        }
    }

    /// Text suitable for showing next to the form that caused the error.
    pub fn message(&self) -> &str {
        match self {
            Self::Network(message)
            | Self::Unauthorized(message)
            | Self::Invalid(message)
            | Self::Decode(message)
            | Self::Storage(message) => message,
            Self::Rejected { message, .. } => message,
        }
    }

    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }

    /// Whether the request was never sent because a local check failed.
    pub const fn is_client_side(&self) -> bool {
        matches!(self, Self::Invalid(_))
    }
}

/// Pulls the human-readable message out of an error body.
fn server_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["error", "msg", "message"]
        .iter()
        .find_map(|key| value.get(key).and_then(Value::as_str))
        .map(str::to_string)
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(message) => write!(f, "Network error: {message}"),
            Self::Rejected { status, message } => write!(f, "Server error ({status}): {message}"),
            Self::Unauthorized(message) => write!(f, "Not authorized: {message}"),
            Self::Invalid(message) => write!(f, "{message}"),
            Self::Decode(message) => write!(f, "Unexpected response: {message}"),
            Self::Storage(message) => write!(f, "Credential storage error: {message}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(format!("IO error: {err}"))
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(format!("JSON error: {err}"))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[macro_export]
macro_rules! invalid {
    ($msg:literal) => {
        $crate::utils::error::ApiError::Invalid($msg.to_string())
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::utils::error::ApiError::Invalid(format!($fmt, $($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_error_key_is_surfaced_verbatim() {
        let err = ApiError::from_response(400, r#"{"error": "Email already registered"}"#);
        assert_eq!(
            err,
            ApiError::Rejected {
                status: 400,
                message: "Email already registered".to_string()
            }
        );
        assert_eq!(err.message(), "Email already registered");
    }

    #[test]
    fn token_layer_errors_are_unauthorized() {
        let err = ApiError::from_response(401, r#"{"msg": "Token has expired"}"#);
        assert!(err.is_unauthorized());
        assert_eq!(err.message(), "Token has expired");

        let err = ApiError::from_response(422, r#"{"msg": "Not enough segments"}"#);
        assert!(err.is_unauthorized());
    }

    #[test]
    fn unparseable_body_falls_back_to_status() {
        let err = ApiError::from_response(502, "<html>Bad Gateway</html>");
        assert_eq!(err.message(), "Request failed with status 502");
    }

    #[test]
    fn invalid_macro_formats() {
        let err = invalid!("{} is required", "title");
        assert!(err.is_client_side());
        assert_eq!(err.to_string(), "title is required");
    }
}
