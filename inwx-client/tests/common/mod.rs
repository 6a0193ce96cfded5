//! Common test utilities for inwx-client integration tests
//!
//! This module provides a scripted in-process transport and an axum-based
//! HTTP server for testing client behavior without the real DomRobot API.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::extract::State;
use axum::http::{header, HeaderValue, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use futures::StreamExt;
use inwx_client::Transport;
use reqwest::header::HeaderMap;
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

/// Scripted reply of a mock transport or server
#[derive(Debug, Clone)]
pub struct MockReply {
    pub status: u16,
    pub body: String,
    pub set_cookie: Option<String>,
    /// Announced `Content-Length`; the server sends `body` and then stalls
    pub declared_length: Option<usize>,
}

impl MockReply {
    /// A `200 OK` reply with a JSON body
    pub fn json(body: serde_json::Value) -> Self {
        Self {
            status: 200,
            body: body.to_string(),
            set_cookie: None,
            declared_length: None,
        }
    }

    /// A reply with an arbitrary body and status
    pub fn raw(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            set_cookie: None,
            declared_length: None,
        }
    }

    /// A reply that announces `declared_length` bytes, sends `prefix` and
    /// never finishes the body
    ///
    /// Only the HTTP server honours this; the in-process transport sends
    /// `prefix` as the complete body.
    pub fn stalling(prefix: impl Into<String>, declared_length: usize) -> Self {
        Self {
            status: 200,
            body: prefix.into(),
            set_cookie: None,
            declared_length: Some(declared_length),
        }
    }

    /// Attach a `Set-Cookie` header
    pub fn with_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.set_cookie = Some(cookie.into());
        self
    }
}

/// Request as seen by the mock transport
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: reqwest::Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: serde_json::Value,
}

impl RecordedRequest {
    /// Value of a header, if present and valid UTF-8
    pub fn header(&self, name: &str) -> Option<String> {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }
}

/// In-process transport that records requests and answers from a script
///
/// Once the script is exhausted every request gets `{"code":1000}`.
#[derive(Default)]
pub struct MockTransport {
    replies: Mutex<VecDeque<MockReply>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockTransport {
    /// Create a transport answering with `replies` in order
    pub fn new(replies: impl IntoIterator<Item = MockReply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// All requests seen so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// The most recent request
    pub fn last_request(&self) -> RecordedRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request recorded")
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, request: reqwest::Request) -> inwx_core::Result<reqwest::Response> {
        let body = request
            .body()
            .and_then(|b| b.as_bytes())
            .map(|bytes| serde_json::from_slice(bytes).unwrap())
            .unwrap_or(serde_json::Value::Null);

        self.requests.lock().unwrap().push(RecordedRequest {
            method: request.method().clone(),
            url: request.url().to_string(),
            headers: request.headers().clone(),
            body,
        });

        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| MockReply::json(serde_json::json!({"code": 1000})));

        let mut builder = http::Response::builder().status(reply.status);
        if let Some(cookie) = reply.set_cookie {
            builder = builder.header("set-cookie", cookie);
        }
        Ok(builder.body(reply.body).unwrap().into())
    }
}

/// Transport that always fails
pub struct FailingTransport;

#[async_trait]
impl Transport for FailingTransport {
    async fn execute(&self, _request: reqwest::Request) -> inwx_core::Result<reqwest::Response> {
        Err(inwx_core::Error::Transport("connection refused".into()))
    }
}

/// Request as seen by the mock HTTP server
#[derive(Debug, Clone)]
pub struct ServerRequest {
    pub method: Method,
    pub path: String,
    pub headers: axum::http::HeaderMap,
    pub body: String,
}

impl ServerRequest {
    /// Value of a header, if present and valid UTF-8
    pub fn header(&self, name: &str) -> Option<String> {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }

    /// Body parsed as JSON
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

type Handler = dyn Fn(&ServerRequest) -> MockReply + Send + Sync;

#[derive(Clone)]
struct ServerState {
    handler: Arc<Handler>,
    request_tx: mpsc::Sender<ServerRequest>,
}

/// Mock HTTP server for end-to-end client testing
///
/// Serves a single `POST /jsonrpc/` route. Every request is recorded and
/// answered through the handler.
pub struct MockHttpServer {
    addr: SocketAddr,
    shutdown_tx: mpsc::Sender<()>,
    request_rx: mpsc::Receiver<ServerRequest>,
}

impl MockHttpServer {
    /// Start a mock server that answers every request through `handler`
    pub async fn with_handler<F>(handler: F) -> Self
    where
        F: Fn(&ServerRequest) -> MockReply + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
        let (request_tx, request_rx) = mpsc::channel::<ServerRequest>(100);

        let state = ServerState {
            handler: Arc::new(handler),
            request_tx,
        };
        let app = Router::new()
            .route("/jsonrpc/", post(handle_rpc))
            .with_state(state);

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.recv().await;
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            shutdown_tx,
            request_rx,
        }
    }

    /// Base URL of the JSON-RPC endpoint on this server
    pub fn url(&self) -> String {
        format!("http://{}/jsonrpc/", self.addr)
    }

    /// Wait for the next request received by the server
    pub async fn next_request(&mut self) -> Option<ServerRequest> {
        tokio::time::timeout(tokio::time::Duration::from_secs(5), self.request_rx.recv())
            .await
            .ok()
            .flatten()
    }

    /// Shutdown the mock server
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
    }
}

async fn handle_rpc(
    State(state): State<ServerState>,
    method: Method,
    uri: Uri,
    headers: axum::http::HeaderMap,
    body: String,
) -> Response {
    let request = ServerRequest {
        method,
        path: uri.path().to_string(),
        headers,
        body,
    };

    let reply = (state.handler)(&request);
    let _ = state.request_tx.send(request).await;

    let status = StatusCode::from_u16(reply.status).unwrap();
    let mut response = match reply.declared_length {
        Some(length) => {
            let prefix = futures::stream::iter([Ok::<_, std::io::Error>(reply.body.into_bytes())]);
            let body = Body::from_stream(prefix.chain(futures::stream::pending()));
            let mut response = (status, body).into_response();
            response
                .headers_mut()
                .insert(header::CONTENT_LENGTH, HeaderValue::from(length));
            response
        }
        None => (status, reply.body).into_response(),
    };

    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    if let Some(cookie) = reply.set_cookie {
        response
            .headers_mut()
            .insert(header::SET_COOKIE, HeaderValue::from_str(&cookie).unwrap());
    }
    response
}

/// A response envelope with code, message and optional result data
pub fn envelope(code: i64, msg: &str, data: Option<serde_json::Value>) -> serde_json::Value {
    let mut response = serde_json::json!({
        "code": code,
        "msg": msg,
        "svTRID": "20250101-1234",
    });
    if let Some(data) = data {
        response["resData"] = data;
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_format() {
        let response = envelope(1000, "ok", Some(serde_json::json!({"x": 1})));
        assert_eq!(response["code"], 1000);
        assert_eq!(response["resData"]["x"], 1);
    }

    #[tokio::test]
    async fn test_mock_server_records_requests() {
        let mut server =
            MockHttpServer::with_handler(|_| MockReply::json(envelope(1000, "ok", None))).await;

        let response = reqwest::Client::new()
            .post(server.url())
            .header("cookie", "a=b")
            .body(r#"{"method":"ping"}"#)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);

        let request = server.next_request().await.unwrap();
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.path, "/jsonrpc/");
        assert_eq!(request.header("COOKIE").as_deref(), Some("a=b"));
        assert_eq!(request.json()["method"], "ping");

        server.shutdown().await;
    }
}
