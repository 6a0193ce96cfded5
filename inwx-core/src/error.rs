//! Error types for inwx
//!
//! All failures of a DomRobot call are reported through one [`Error`] enum.
//! API-level failures (result code `>= 2000`) carry an [`ApiError`] together
//! with the full response envelope, so that `reason` and `reasonCode` stay
//! available for diagnosis.
//!
//! # Error Categories
//!
//! - **Construction**: `InvalidUrl`, `Transport` while building the default transport
//! - **Transport**: `Transport`, `Timeout`
//! - **Decoding**: `Decode`, `DecodeUnreadable`, `Serialization`
//! - **API**: `Api`
//! - **Setup**: `Internal`
//!
//! # Examples
//!
//! ```rust
//! use inwx_core::ApiError;
//!
//! let error = ApiError::new(2200, "Authentication error");
//! assert_eq!(error.code(), 2200);
//! assert_eq!(error.to_string(), "(Code=2200) \"Authentication error\"");
//! ```

use crate::types::Response;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for inwx operations
pub type Result<T> = std::result::Result<T, Error>;

/// Application-level error type for inwx operations
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// The base URL could not be parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// HTTP transport failure
    ///
    /// Covers connection and TLS failures while sending, as well as a failure
    /// to build the default transport.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The timeout configured on the HTTP client elapsed
    #[error("Request timeout")]
    Timeout,

    /// Encoding a request or decoding `resData` into a typed value failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The response body is not a valid response envelope
    ///
    /// `body` holds the raw response text.
    #[error("Decode error: {message}: {body}")]
    Decode {
        /// Parser error message
        message: String,
        /// Raw response body
        body: String,
    },

    /// The response body could neither be parsed nor read completely
    #[error("Decode error: {parse}; reading response body failed: {read}")]
    DecodeUnreadable {
        /// Parser error message
        parse: String,
        /// Body read error message
        read: String,
    },

    /// Failure outside the call path, e.g. while setting up telemetry
    #[error("Internal error: {0}")]
    Internal(String),

    /// The API answered with a failure code
    #[error("API error: {error}")]
    Api {
        /// Code and message of the failure
        error: ApiError,
        /// The full response envelope
        response: Box<Response>,
    },
}

impl Error {
    /// The API error, if this is an API failure
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Error::Api { error, .. } => Some(error),
            _ => None,
        }
    }

    /// The response envelope, if this is an API failure
    pub fn response(&self) -> Option<&Response> {
        match self {
            Error::Api { response, .. } => Some(response),
            _ => None,
        }
    }

    /// The API result code, if this is an API failure
    pub fn code(&self) -> Option<i64> {
        self.api_error().map(ApiError::code)
    }

    /// Short label of the error category, used as a metrics attribute
    pub fn kind(&self) -> &'static str {
        match self {
            Error::InvalidUrl(_) => "invalid_url",
            Error::Transport(_) => "transport",
            Error::Timeout => "timeout",
            Error::Serialization(_) => "serialization",
            Error::Decode { .. } | Error::DecodeUnreadable { .. } => "decode",
            Error::Internal(_) => "internal",
            Error::Api { .. } => "api",
        }
    }
}

/// API failure as reported by the result code
///
/// See <https://www.inwx.com/en/help/apidoc/f/ch04.html> for the list of codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    code: i64,
    message: String,
}

impl ApiError {
    /// Create an API error from a result code and its message
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Result code
    pub fn code(&self) -> i64 {
        self.code
    }

    /// Human-readable message sent by the API
    pub fn description(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(Code={}) {:?}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
