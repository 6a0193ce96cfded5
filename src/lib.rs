//! INWX - DomRobot API client
//!
//! This is the main convenience crate that re-exports all inwx sub-crates.
//! Use this crate if you want a single dependency for talking to the INWX
//! DomRobot JSON-RPC API.
//!
//! # Architecture
//!
//! inwx is organized into modular crates:
//!
//! - **inwx-core**: Wire types, codec, error handling, observability
//! - **inwx-client**: HTTP client with session cookie handling
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use inwx::{DomRobot, Endpoint};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = DomRobot::connect(Endpoint::Production)?;
//!
//!     client.login("user", "secret").await?;
//!     let response = client
//!         .call("nameserver.info", json!({"domain": "example.com"}))
//!         .await?;
//!     println!("Result: {}", response.data);
//!     client.logout().await?;
//!
//!     Ok(())
//! }
//! ```

pub use inwx_client as client;
pub use inwx_core as core;

pub use inwx_client::{ClientBuilder, DomRobot, HttpClient};
pub use inwx_core::{ApiError, Endpoint, Error, Response, Result, PROD_API, TEST_API};
