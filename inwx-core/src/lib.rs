//! Core types and codec for the INWX DomRobot JSON-RPC API
//!
//! This crate holds everything about the API that does not depend on an HTTP
//! stack:
//!
//! - **Types**: request/response envelopes, endpoints and protocol constants
//! - **Codec**: envelope encoding and diagnosable decoding
//! - **Error handling**: the crate-wide `Error` and the structured `ApiError`
//! - **Observability**: OpenTelemetry bootstrap for applications
//!
//! The `inwx-client` crate builds the HTTP transport on top of it.
//!
//! # Example
//!
//! ```rust
//! use inwx_core::codec;
//!
//! let response = codec::decode_response(br#"{"code":2201,"msg":"Authorization failed"}"#).unwrap();
//! let err = response.into_result().unwrap_err();
//! assert_eq!(err.code(), Some(2201));
//! ```

pub mod codec;
pub mod error;
pub mod observability;
pub mod types;

pub use error::{ApiError, Error, Result};
pub use observability::{init_observability, shutdown_observability, ObservabilityConfig};
pub use types::{
    Endpoint, Response, RpcRequest, CLIENT_TRANSACTION_ID, ERROR_CODE_THRESHOLD, LANGUAGE,
    LOGIN_METHOD, LOGIN_SUCCESS_CODE, LOGOUT_METHOD, PROD_API, TEST_API,
};
