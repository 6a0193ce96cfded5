//! Outbound HTTP transport and the header-stamping decorator
//!
//! [`Transport`] is the "send one HTTP request, get one HTTP response"
//! capability the client is built on. `reqwest::Client` is the default
//! implementation; tests and callers with special needs (proxies, recording,
//! fault injection) plug in their own.
//!
//! [`HeaderTransport`] wraps any transport and stamps every request with the
//! client's `User-Agent` and a JSON `Content-Type` before forwarding it.
//!
//! # Examples
//!
//! ```rust
//! use inwx_client::{HeaderTransport, Transport};
//! use std::sync::Arc;
//!
//! let base: Arc<dyn Transport> = Arc::new(reqwest::Client::new());
//! let stamped = HeaderTransport::new(base);
//! # let _ = stamped;
//! ```

use async_trait::async_trait;
use inwx_core::{Error, Result};
use reqwest::header::{HeaderValue, CONTENT_TYPE, USER_AGENT};
use std::sync::Arc;

/// `User-Agent` sent with every request
pub const CLIENT_USER_AGENT: &str = "github.com/klingtnet/inwxclient";

/// `Content-Type` of every request body
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Capability to perform a single HTTP round trip
///
/// Implementations must not retry; errors are reported as `Error::Transport`
/// (or `Error::Timeout`).
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send the request and return the response with its body unread
    async fn execute(&self, request: reqwest::Request) -> Result<reqwest::Response>;
}

#[async_trait]
impl Transport for reqwest::Client {
    async fn execute(&self, request: reqwest::Request) -> Result<reqwest::Response> {
        reqwest::Client::execute(self, request).await.map_err(transport_error)
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn execute(&self, request: reqwest::Request) -> Result<reqwest::Response> {
        (**self).execute(request).await
    }
}

/// Convert a reqwest error, keeping its source chain in the message
pub(crate) fn transport_error(error: reqwest::Error) -> Error {
    if error.is_timeout() {
        return Error::Timeout;
    }

    Error::Transport(error_chain(&error))
}

/// Render an error and all of its sources, joined by `": "`
pub(crate) fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Decorator that stamps `User-Agent` and `Content-Type` on every request
///
/// Existing values of both headers are replaced. Method, URL and body pass
/// through untouched, and errors of the wrapped transport are returned as-is.
#[derive(Clone)]
pub struct HeaderTransport {
    inner: Arc<dyn Transport>,
}

impl HeaderTransport {
    /// Wrap a transport
    pub fn new(inner: Arc<dyn Transport>) -> Self {
        Self { inner }
    }

    /// The wrapped transport
    pub fn inner(&self) -> &Arc<dyn Transport> {
        &self.inner
    }
}

impl std::fmt::Debug for HeaderTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeaderTransport")
            .field("user_agent", &CLIENT_USER_AGENT)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Transport for HeaderTransport {
    async fn execute(&self, mut request: reqwest::Request) -> Result<reqwest::Response> {
        let headers = request.headers_mut();
        headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));

        self.inner.execute(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::{Method, Url};
    use std::sync::Mutex;

    /// Parts of a request as seen by the innermost transport
    #[derive(Debug, Clone)]
    struct Seen {
        method: Method,
        url: Url,
        user_agent: Option<String>,
        content_type: Option<String>,
        accept: Option<String>,
        body: Option<Vec<u8>>,
    }

    #[derive(Default)]
    struct RecordingTransport {
        seen: Mutex<Vec<Seen>>,
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        async fn execute(&self, request: reqwest::Request) -> Result<reqwest::Response> {
            let header = |name: reqwest::header::HeaderName| {
                request
                    .headers()
                    .get(name)
                    .and_then(|v: &HeaderValue| v.to_str().ok())
                    .map(str::to_string)
            };
            let seen = Seen {
                method: request.method().clone(),
                url: request.url().clone(),
                user_agent: header(USER_AGENT),
                content_type: header(CONTENT_TYPE),
                accept: header(reqwest::header::ACCEPT),
                body: request.body().and_then(|b| b.as_bytes()).map(<[u8]>::to_vec),
            };
            self.seen.lock().unwrap().push(seen);

            Ok(http::Response::builder()
                .status(200)
                .body(r#"{"code":1000}"#.to_string())
                .unwrap()
                .into())
        }
    }

    struct FailingTransport;

    #[async_trait]
    impl Transport for FailingTransport {
        async fn execute(&self, _request: reqwest::Request) -> Result<reqwest::Response> {
            Err(Error::Transport("connection refused".to_string()))
        }
    }

    fn post(url: &str, body: &'static str) -> reqwest::Request {
        let mut request = reqwest::Request::new(Method::POST, Url::parse(url).unwrap());
        *request.body_mut() = Some(body.into());
        request
    }

    #[tokio::test]
    async fn test_headers_are_stamped() {
        let recorder = Arc::new(RecordingTransport::default());
        let transport = HeaderTransport::new(recorder.clone());

        transport.execute(post("https://api.ote.domrobot.com/jsonrpc/", "{}")).await.unwrap();

        let seen = recorder.seen.lock().unwrap()[0].clone();
        assert_eq!(seen.user_agent.as_deref(), Some(CLIENT_USER_AGENT));
        assert_eq!(seen.content_type.as_deref(), Some(JSON_CONTENT_TYPE));
    }

    #[tokio::test]
    async fn test_existing_headers_are_overwritten() {
        let recorder = Arc::new(RecordingTransport::default());
        let transport = HeaderTransport::new(recorder.clone());

        let mut request = post("https://api.domrobot.com/jsonrpc/", "{}");
        request.headers_mut().insert(USER_AGENT, HeaderValue::from_static("curl/8.0"));
        request.headers_mut().insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        request.headers_mut().insert(reqwest::header::ACCEPT, HeaderValue::from_static("*/*"));
        transport.execute(request).await.unwrap();

        let seen = recorder.seen.lock().unwrap()[0].clone();
        assert_eq!(seen.user_agent.as_deref(), Some(CLIENT_USER_AGENT));
        assert_eq!(seen.content_type.as_deref(), Some(JSON_CONTENT_TYPE));
        // Unrelated headers survive
        assert_eq!(seen.accept.as_deref(), Some("*/*"));
    }

    #[tokio::test]
    async fn test_method_url_and_body_untouched() {
        let recorder = Arc::new(RecordingTransport::default());
        let transport = HeaderTransport::new(recorder.clone());

        transport
            .execute(post("https://api.ote.domrobot.com/jsonrpc/?x=1", r#"{"method":"ping"}"#))
            .await
            .unwrap();

        let seen = recorder.seen.lock().unwrap()[0].clone();
        assert_eq!(seen.method, Method::POST);
        assert_eq!(seen.url.as_str(), "https://api.ote.domrobot.com/jsonrpc/?x=1");
        assert_eq!(seen.body.as_deref(), Some(br#"{"method":"ping"}"#.as_slice()));
    }

    #[tokio::test]
    async fn test_inner_error_propagates_unchanged() {
        let transport = HeaderTransport::new(Arc::new(FailingTransport));

        let err = transport.execute(post("https://api.domrobot.com/jsonrpc/", "{}")).await.unwrap_err();
        match err {
            Error::Transport(msg) => assert_eq!(msg, "connection refused"),
            other => panic!("Expected Transport error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_decorators_compose() {
        let recorder = Arc::new(RecordingTransport::default());
        let inner: Arc<dyn Transport> = Arc::new(HeaderTransport::new(recorder.clone()));
        let outer = HeaderTransport::new(inner);

        outer.execute(post("https://api.domrobot.com/jsonrpc/", "{}")).await.unwrap();

        let seen = recorder.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].user_agent.as_deref(), Some(CLIENT_USER_AGENT));
    }

    #[tokio::test]
    async fn test_reqwest_connection_failure_is_transport_error() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let client = reqwest::Client::new();
        let url = format!("http://127.0.0.1:{}/", port);
        let mut request = reqwest::Request::new(Method::POST, Url::parse(&url).unwrap());
        *request.body_mut() = Some("{}".into());

        let err = Transport::execute(&client, request).await.unwrap_err();

        assert!(matches!(err, Error::Transport(_)), "got {:?}", err);
    }

    #[derive(Debug)]
    struct BodyError(std::io::Error);

    impl std::fmt::Display for BodyError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("error decoding response body")
        }
    }

    impl std::error::Error for BodyError {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn test_error_chain_includes_sources() {
        let error = BodyError(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "peer went away"));

        assert_eq!(error_chain(&error), "error decoding response body: peer went away");
    }
}
