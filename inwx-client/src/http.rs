//! HTTP client and the client factory
//!
//! [`HttpClient`] is the caller-owned HTTP client handed to
//! [`DomRobot::new`](crate::DomRobot::new). It bundles a [`Transport`], a
//! cookie jar and an optional timeout. Any of them may be left unset.
//!
//! [`prepare`] turns such a client into one that is usable against the
//! DomRobot API:
//!
//! 1. The configured transport (or a default `reqwest::Client`) is wrapped in
//!    a [`HeaderTransport`].
//! 2. A configured cookie jar is kept as-is, so existing session state
//!    survives. Otherwise an empty in-memory [`Jar`] is attached.
//!
//! # Cookies
//!
//! The client sends the jar's cookies for the target URL with every request
//! but never stores response cookies on its own; see [`HttpClient::set_cookies`].
//!
//! # Examples
//!
//! ```rust
//! use inwx_client::{http, HttpClient, Jar};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let jar = Arc::new(Jar::default());
//! let client = HttpClient::builder()
//!     .cookie_jar(jar)
//!     .timeout(Duration::from_secs(30))
//!     .build();
//!
//! let prepared = http::prepare(client).unwrap();
//! assert!(prepared.transport().is_some());
//! ```

use crate::transport::{transport_error, HeaderTransport, Transport};
use inwx_core::{Error, Result};
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, COOKIE, SET_COOKIE};
use reqwest::{Method, Url};
use std::sync::Arc;
use std::time::Duration;

/// HTTP client with a pluggable transport and cookie jar
#[derive(Clone, Default)]
pub struct HttpClient {
    transport: Option<Arc<dyn Transport>>,
    cookie_jar: Option<Arc<dyn CookieStore>>,
    timeout: Option<Duration>,
}

impl HttpClient {
    /// Client without transport, jar or timeout
    pub fn new() -> Self {
        Self::default()
    }

    /// Start building a client
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Configured transport
    pub fn transport(&self) -> Option<&Arc<dyn Transport>> {
        self.transport.as_ref()
    }

    /// Configured cookie jar
    pub fn cookie_jar(&self) -> Option<&Arc<dyn CookieStore>> {
        self.cookie_jar.as_ref()
    }

    /// Configured request timeout
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// POST `body` to `url`
    ///
    /// Attaches the jar's cookies for `url`. Without a configured transport a
    /// default `reqwest::Client` is used for this request.
    ///
    /// # Errors
    ///
    /// - `Error::Transport` if the request could not be sent
    /// - `Error::Timeout` if the configured timeout elapsed first
    pub async fn post(
        &self,
        url: &Url,
        content_type: &str,
        body: impl Into<reqwest::Body>,
    ) -> Result<reqwest::Response> {
        let mut request = reqwest::Request::new(Method::POST, url.clone());
        let content_type = HeaderValue::from_str(content_type)
            .map_err(|e| Error::Transport(format!("invalid content type: {}", e)))?;
        request.headers_mut().insert(CONTENT_TYPE, content_type);
        *request.body_mut() = Some(body.into());

        if let Some(cookies) = self.cookie_jar.as_ref().and_then(|jar| jar.cookies(url)) {
            request.headers_mut().insert(COOKIE, cookies);
        }

        match &self.transport {
            Some(transport) => self.execute_with_timeout(transport.as_ref(), request).await,
            None => {
                let transport = default_transport()?;
                self.execute_with_timeout(&transport, request).await
            }
        }
    }

    async fn execute_with_timeout(
        &self,
        transport: &dyn Transport,
        mut request: reqwest::Request,
    ) -> Result<reqwest::Response> {
        match self.timeout {
            Some(limit) => {
                // reqwest also applies it to reading the body
                *request.timeout_mut() = Some(limit);
                tokio::time::timeout(limit, transport.execute(request))
                    .await
                    .map_err(|_| Error::Timeout)?
            }
            None => transport.execute(request).await,
        }
    }

    /// Store the `Set-Cookie` headers of a response in the jar, keyed by `url`
    ///
    /// Does nothing without a jar.
    pub fn set_cookies(&self, url: &Url, headers: &HeaderMap) {
        if let Some(jar) = &self.cookie_jar {
            let mut cookies = headers.get_all(SET_COOKIE).iter();
            jar.set_cookies(&mut cookies, url);
        }
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("transport", &self.transport.is_some())
            .field("cookie_jar", &self.cookie_jar.is_some())
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Builder for [`HttpClient`]
#[derive(Default)]
pub struct HttpClientBuilder {
    transport: Option<Arc<dyn Transport>>,
    cookie_jar: Option<Arc<dyn CookieStore>>,
    timeout: Option<Duration>,
}

impl HttpClientBuilder {
    /// Use this transport
    pub fn transport<T: Transport + 'static>(mut self, transport: T) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Use a transport that is shared with other clients
    pub fn shared_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Use this cookie jar
    pub fn cookie_jar<J: CookieStore + 'static>(mut self, jar: Arc<J>) -> Self {
        self.cookie_jar = Some(jar as Arc<dyn CookieStore>);
        self
    }

    /// Abort calls that take longer than `timeout`, including the body read
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the client
    pub fn build(self) -> HttpClient {
        HttpClient {
            transport: self.transport,
            cookie_jar: self.cookie_jar,
            timeout: self.timeout,
        }
    }
}

/// Make a client usable against the DomRobot API
///
/// Wraps the client's transport (or a default one) in a [`HeaderTransport`]
/// and attaches an empty [`Jar`] if the client has no cookie jar yet.
///
/// # Errors
///
/// `Error::Transport` if the default transport cannot be built (e.g. the TLS
/// backend fails to initialize).
pub fn prepare(client: HttpClient) -> Result<HttpClient> {
    let base = match client.transport {
        Some(transport) => transport,
        None => Arc::new(default_transport()?) as Arc<dyn Transport>,
    };
    let cookie_jar = client
        .cookie_jar
        .unwrap_or_else(|| Arc::new(Jar::default()) as Arc<dyn CookieStore>);

    Ok(HttpClient {
        transport: Some(Arc::new(HeaderTransport::new(base))),
        cookie_jar: Some(cookie_jar),
        timeout: client.timeout,
    })
}

fn default_transport() -> Result<reqwest::Client> {
    reqwest::Client::builder().build().map_err(transport_error)
}
