//! DomRobot JSON-RPC wire types
//!
//! The DomRobot API speaks a JSON-RPC dialect over plain HTTP POST. It is not
//! JSON-RPC 2.0: there is no `jsonrpc` field and no numeric request id.
//! Instead every request carries a client transaction id (`clTRID`) and a
//! language tag, and every response carries a numeric result `code`.
//!
//! # Result Codes
//!
//! - `1000..2000`: success (`1000` is plain "Command completed successfully")
//! - `>= 2000`: failure, described by `msg`, `reason` and `reasonCode`
//!
//! # Endpoints
//!
//! Two public endpoints exist, the OTE (test/staging) system and the live
//! system. Both are exposed as constants and through [`Endpoint`].

use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// URL of the OTE (test/staging) API
pub const TEST_API: &str = "https://api.ote.domrobot.com/jsonrpc/";

/// URL of the live API
pub const PROD_API: &str = "https://api.domrobot.com/jsonrpc/";

/// Client transaction id sent with every request
pub const CLIENT_TRANSACTION_ID: &str = "github.com/klingtnet/inwxclient";

/// Language requested for human-readable response messages
pub const LANGUAGE: &str = "en";

/// Method that establishes a session
pub const LOGIN_METHOD: &str = "account.login";

/// Method that ends a session
pub const LOGOUT_METHOD: &str = "account.logout";

/// The exact result code of a successful login
pub const LOGIN_SUCCESS_CODE: i64 = 1000;

/// Codes at or above this value are failures
pub const ERROR_CODE_THRESHOLD: i64 = 2000;

/// Target API system
///
/// # Examples
///
/// ```rust
/// use inwx_core::{Endpoint, TEST_API};
///
/// assert_eq!(Endpoint::Test.url(), TEST_API);
/// assert_eq!(Endpoint::from("http://localhost:8080/").url(), "http://localhost:8080/");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Endpoint {
    /// OTE test system
    #[default]
    Test,
    /// Live system
    Production,
    /// Any other base URL (local mocks, proxies)
    Custom(String),
}

impl Endpoint {
    /// Base URL of the endpoint
    pub fn url(&self) -> &str {
        match self {
            Endpoint::Test => TEST_API,
            Endpoint::Production => PROD_API,
            Endpoint::Custom(url) => url,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url())
    }
}

impl From<&str> for Endpoint {
    fn from(url: &str) -> Self {
        match url {
            TEST_API => Endpoint::Test,
            PROD_API => Endpoint::Production,
            other => Endpoint::Custom(other.to_string()),
        }
    }
}

impl From<String> for Endpoint {
    fn from(url: String) -> Self {
        Endpoint::from(url.as_str())
    }
}

/// Request envelope
///
/// Built fresh for every call. `params` is generic so that callers can pass
/// typed parameter structs without first converting them to `serde_json::Value`.
///
/// # Examples
///
/// ```rust
/// use inwx_core::RpcRequest;
/// use serde_json::json;
///
/// let request = RpcRequest::new("nameserver.info", json!({"domain": "example.com"}));
/// assert_eq!(request.method, "nameserver.info");
/// assert_eq!(request.lang, "en");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcRequest<P = serde_json::Value> {
    /// Remote method, e.g. `nameserver.info`
    pub method: String,
    /// Method parameters, serialized as-is (`None` becomes `null`)
    pub params: P,
    /// Client transaction id
    #[serde(rename = "clTRID")]
    pub client_transaction_id: String,
    /// Response language
    pub lang: String,
}

impl<P> RpcRequest<P> {
    /// Create a request with the fixed transaction id and language
    pub fn new(method: impl Into<String>, params: P) -> Self {
        Self {
            method: method.into(),
            params,
            client_transaction_id: CLIENT_TRANSACTION_ID.to_string(),
            lang: LANGUAGE.to_string(),
        }
    }
}

/// Response envelope
///
/// Every field but `code` may be missing on the wire and then takes its
/// default value. `data` stays untyped; use [`Response::data_as`] to decode
/// it into a concrete type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Result code of the operation, see the module docs
    pub code: i64,
    /// Human-readable explanation of the code
    #[serde(rename = "msg", default)]
    pub message: String,
    /// Method specific payload
    #[serde(rename = "resData", default)]
    pub data: serde_json::Value,
    /// Additional error message
    #[serde(default)]
    pub reason: String,
    /// Short tag for the additional error message
    #[serde(rename = "reasonCode", default)]
    pub reason_code: String,
    /// Server transaction id, useful when talking to INWX support
    #[serde(rename = "svTRID", default)]
    pub server_transaction_id: String,
}

impl Response {
    /// Whether the code is in the success range
    pub fn is_success(&self) -> bool {
        self.code < ERROR_CODE_THRESHOLD
    }

    /// The API error described by this response, if its code is a failure
    pub fn api_error(&self) -> Option<ApiError> {
        if self.is_success() {
            None
        } else {
            Some(ApiError::new(self.code, self.message.clone()))
        }
    }

    /// Turn a failure code into `Error::Api`, keeping the envelope
    pub fn into_result(self) -> crate::Result<Self> {
        match self.api_error() {
            None => Ok(self),
            Some(error) => Err(crate::Error::Api {
                error,
                response: Box::new(self),
            }),
        }
    }

    /// Decode `resData` into a concrete type
    pub fn data_as<T: serde::de::DeserializeOwned>(&self) -> crate::Result<T> {
        serde_json::from_value(self.data.clone())
            .map_err(|e| crate::Error::Serialization(e.to_string()))
    }
}
