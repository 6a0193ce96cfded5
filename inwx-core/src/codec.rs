//! Codec for DomRobot envelopes
//!
//! Encoding is plain serde. Decoding keeps the raw body around: when a
//! response cannot be parsed, the error carries the body text so that HTML
//! error pages from proxies or truncated replies show up in logs instead of
//! an opaque parser message.
//!
//! # Examples
//!
//! ```rust
//! use inwx_core::codec;
//! use serde_json::json;
//!
//! let body = codec::encode_request("nameserver.info", &json!({"domain": "example.com"})).unwrap();
//! assert!(body.contains("\"clTRID\""));
//!
//! let response = codec::decode_response(br#"{"code":1000,"msg":"ok"}"#).unwrap();
//! assert_eq!(response.code, 1000);
//! ```

use crate::error::{Error, Result};
use crate::types::{Response, RpcRequest};
use serde::Serialize;

/// Encode a call into a request body
///
/// # Errors
///
/// Returns `Error::Serialization` if `params` cannot be represented as JSON
/// (e.g. a map with non-string keys).
pub fn encode_request<P: Serialize>(method: &str, params: &P) -> Result<String> {
    serde_json::to_string(&RpcRequest::new(method, params))
        .map_err(|e| Error::Serialization(e.to_string()))
}

/// Decode a response body into a response envelope
///
/// # Errors
///
/// Returns `Error::Decode` with the lossily UTF-8 decoded body if the bytes
/// are not a JSON object with at least an integer `code`.
pub fn decode_response(body: &[u8]) -> Result<Response> {
    serde_json::from_slice(body).map_err(|e| Error::Decode {
        message: e.to_string(),
        body: String::from_utf8_lossy(body).into_owned(),
    })
}

/// Decode a response body that may have been cut short by a read failure
///
/// A body that parses is accepted even if the read reported an error
/// afterwards. Otherwise the read failure is reported together with the
/// parse failure.
pub fn decode_partial_response(body: &[u8], read_error: Option<String>) -> Result<Response> {
    match (decode_response(body), read_error) {
        (Ok(response), _) => Ok(response),
        (Err(Error::Decode { message, .. }), Some(read)) => {
            Err(Error::DecodeUnreadable { parse: message, read })
        }
        (Err(e), _) => Err(e),
    }
}
