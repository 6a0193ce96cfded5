//! JSON-RPC over HTTP client for the INWX DomRobot API
//!
//! This crate sends DomRobot calls as HTTP POST requests and keeps the
//! session cookie established by `account.login` for all later calls.
//!
//! # Core Features
//!
//! - **Single call operation**: [`DomRobot::call`] encodes, posts, decodes and
//!   maps failure codes to structured errors
//! - **Pluggable transport**: any [`Transport`], stamped with the client's
//!   headers by [`HeaderTransport`]
//! - **Session cookies**: captured after a successful login and replayed from
//!   a shared cookie jar
//! - **Observability**: `tracing` spans and optional OpenTelemetry metrics
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use inwx_client::DomRobot;
//! use inwx_core::Endpoint;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = DomRobot::connect(Endpoint::Test)?;
//!
//!     client.login("user", "secret").await?;
//!     let info = client
//!         .call("nameserver.info", json!({"domain": "example.com", "name": "www"}))
//!         .await?;
//!     println!("Records: {}", info.data);
//!     client.logout().await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Custom HTTP Client
//!
//! ```rust
//! use inwx_client::{DomRobot, HttpClient, Jar};
//! use std::sync::Arc;
//!
//! // Reuse a jar that already holds a session
//! let jar = Arc::new(Jar::default());
//! let http = HttpClient::builder()
//!     .transport(reqwest::Client::new())
//!     .cookie_jar(jar)
//!     .build();
//!
//! let client = DomRobot::new(inwx_core::PROD_API, http).unwrap();
//! # let _ = client;
//! ```

mod client;
mod client_builder;
pub mod http;
mod metrics;
mod transport;

pub use client::DomRobot;
pub use client_builder::ClientBuilder;
pub use http::{prepare, HttpClient, HttpClientBuilder};
pub use metrics::ClientMetrics;
pub use reqwest::cookie::{CookieStore, Jar};
pub use transport::{HeaderTransport, Transport, CLIENT_USER_AGENT, JSON_CONTENT_TYPE};
