//! DomRobot JSON-RPC client
//!
//! [`DomRobot`] sends one JSON-RPC call per HTTP POST to a fixed base URL.
//!
//! # Call Lifecycle
//!
//! 1. **Encode**: wrap method and params in the request envelope
//! 2. **Send**: POST through the prepared HTTP client (headers stamped, cookies attached)
//! 3. **Decode**: read the body and parse the response envelope
//! 4. **Session**: after `account.login` answered with code 1000, store the
//!    response cookies for all later calls
//! 5. **Map**: codes `>= 2000` become `Error::Api`
//!
//! # Sessions
//!
//! Calls are independent. Ordering (logging in before anything else) is up
//! to the caller; concurrent calls issued before the login completed go out
//! without the session cookie.
//!
//! # Cloning
//!
//! `DomRobot` is cheaply cloneable; all clones share the cookie jar and the
//! transport.

use crate::http::{self, HttpClient};
use crate::metrics::ClientMetrics;
use crate::transport::{error_chain, JSON_CONTENT_TYPE};
use inwx_core::{
    codec, Endpoint, Error, Response, Result, LOGIN_METHOD, LOGIN_SUCCESS_CODE, LOGOUT_METHOD,
};
use reqwest::header::HeaderMap;
use reqwest::Url;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

/// Client for the INWX DomRobot API
#[derive(Clone, Debug)]
pub struct DomRobot {
    api_url: Url,
    http: HttpClient,
    pub(crate) metrics: Option<Arc<ClientMetrics>>,
}

impl DomRobot {
    /// Create a client for `api_url` on top of a caller-supplied HTTP client
    ///
    /// The HTTP client is prepared with [`http::prepare`]: its transport gets
    /// wrapped and a cookie jar is attached if it has none.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidUrl` if `api_url` does not parse
    /// - `Error::Transport` if a default transport is needed and cannot be built
    ///
    /// # Examples
    ///
    /// ```rust
    /// use inwx_client::{DomRobot, HttpClient};
    ///
    /// let client = DomRobot::new(inwx_core::TEST_API, HttpClient::new()).unwrap();
    /// assert_eq!(client.api_url().as_str(), inwx_core::TEST_API);
    ///
    /// assert!(DomRobot::new("not a url", HttpClient::new()).is_err());
    /// ```
    pub fn new(api_url: &str, http_client: HttpClient) -> Result<Self> {
        let api_url =
            Url::parse(api_url).map_err(|e| Error::InvalidUrl(format!("{}: {}", api_url, e)))?;
        let http = http::prepare(http_client)?;

        Ok(Self {
            api_url,
            http,
            metrics: None,
        })
    }

    /// Create a client for an endpoint with a default HTTP client
    pub fn connect(endpoint: impl Into<Endpoint>) -> Result<Self> {
        Self::new(endpoint.into().url(), HttpClient::new())
    }

    /// Start building a client for an endpoint
    pub fn builder(endpoint: impl Into<Endpoint>) -> crate::ClientBuilder {
        crate::ClientBuilder::new(endpoint)
    }

    /// Base URL all calls are posted to
    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    /// The prepared HTTP client
    pub fn http_client(&self) -> &HttpClient {
        &self.http
    }

    /// Call a remote method and map failure codes to `Error::Api`
    ///
    /// On a failure code the error still carries the full response envelope,
    /// see [`Error::response`].
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use inwx_client::DomRobot;
    /// use inwx_core::Endpoint;
    /// use serde_json::json;
    ///
    /// # async fn example() -> inwx_core::Result<()> {
    /// let client = DomRobot::connect(Endpoint::Test)?;
    /// client.login("user", "secret").await?;
    /// let info = client
    ///     .call("nameserver.info", json!({"domain": "example.com", "type": "A"}))
    ///     .await?;
    /// println!("{}", info.data);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn call<P: Serialize>(&self, method: &str, params: P) -> Result<Response> {
        let response = self.send(method, params).await?;

        response.into_result().map_err(|e| {
            if let (Some(api), Some(response)) = (e.api_error(), e.response()) {
                tracing::warn!(
                    method = %method,
                    code = api.code(),
                    message = %api.description(),
                    reason = %response.reason,
                    reason_code = %response.reason_code,
                    sv_trid = %response.server_transaction_id,
                    "API call failed"
                );
            }
            e
        })
    }

    /// Call a remote method and decode `resData` into `R`
    ///
    /// # Errors
    ///
    /// Everything [`call`](Self::call) returns, plus `Error::Serialization`
    /// if `resData` does not match `R`.
    pub async fn call_typed<P, R>(&self, method: &str, params: P) -> Result<R>
    where
        P: Serialize,
        R: serde::de::DeserializeOwned,
    {
        self.call(method, params).await?.data_as()
    }

    /// Call a remote method and return the envelope whatever its code
    ///
    /// Only transport and decoding failures are errors here.
    #[tracing::instrument(skip(self, params), fields(method = %method, url = %self.api_url))]
    pub async fn send<P: Serialize>(&self, method: &str, params: P) -> Result<Response> {
        let start = Instant::now();
        let result = self.round_trip(method, &params).await;
        let duration = start.elapsed().as_secs_f64();

        match &result {
            Ok(response) => {
                tracing::debug!(
                    code = response.code,
                    sv_trid = %response.server_transaction_id,
                    duration_secs = duration,
                    "Response received"
                );
                if let Some(ref m) = self.metrics {
                    if response.is_success() {
                        m.record_request(method, "success", duration);
                    } else {
                        m.record_request(method, "api_error", duration);
                        m.record_api_error(method, response.code);
                    }
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Call failed");
                if let Some(ref m) = self.metrics {
                    m.record_request(method, "error", duration);
                    m.record_error(e.kind());
                }
            }
        }

        result
    }

    async fn round_trip<P: Serialize>(&self, method: &str, params: &P) -> Result<Response> {
        let body = codec::encode_request(method, params)?;

        // The limit covers sending and reading the body, whatever the transport.
        let exchange = self.exchange(method, body);
        let (headers, rpc_response) = match self.http.timeout() {
            Some(limit) => tokio::time::timeout(limit, exchange)
                .await
                .map_err(|_| Error::Timeout)??,
            None => exchange.await?,
        };

        if let Some(headers) = headers {
            if rpc_response.code == LOGIN_SUCCESS_CODE {
                self.http.set_cookies(&self.api_url, &headers);
                tracing::debug!("Session cookies stored");
                if let Some(ref m) = self.metrics {
                    m.record_session();
                }
            }
        }

        Ok(rpc_response)
    }

    async fn exchange(&self, method: &str, body: String) -> Result<(Option<HeaderMap>, Response)> {
        let response = self.http.post(&self.api_url, JSON_CONTENT_TYPE, body).await?;
        tracing::debug!(status = %response.status(), "Request sent");

        // Only a login can establish a session, so only then are the headers kept.
        let headers = (method == LOGIN_METHOD).then(|| response.headers().clone());
        let rpc_response = read_response(response).await?;

        Ok((headers, rpc_response))
    }

    /// Log in with account credentials
    ///
    /// On success the session cookie is kept for all later calls.
    pub async fn login(&self, user: &str, pass: &str) -> Result<Response> {
        #[derive(Serialize)]
        struct Credentials<'a> {
            user: &'a str,
            pass: &'a str,
        }

        self.call(LOGIN_METHOD, Credentials { user, pass }).await
    }

    /// End the session
    pub async fn logout(&self) -> Result<Response> {
        self.call(LOGOUT_METHOD, None::<()>).await
    }
}

/// Read the whole body and decode it
///
/// A body read that timed out is `Error::Timeout`; other read failures are
/// kept with their cause chain next to the parse failure. The connection is
/// released when `response` goes out of scope, whatever the outcome.
async fn read_response(mut response: reqwest::Response) -> Result<Response> {
    let mut body = Vec::new();
    let mut read_error = None;

    loop {
        match response.chunk().await {
            Ok(Some(chunk)) => body.extend_from_slice(&chunk),
            Ok(None) => break,
            Err(e) if e.is_timeout() => return Err(Error::Timeout),
            Err(e) => {
                read_error = Some(error_chain(&e));
                break;
            }
        }
    }

    codec::decode_partial_response(&body, read_error)
}
