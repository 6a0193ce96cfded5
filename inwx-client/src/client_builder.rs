//! Client builder for endpoint, HTTP client and observability options
//!
//! # Examples
//!
//! ```rust,no_run
//! use inwx_client::{ClientBuilder, HttpClient};
//! use inwx_core::Endpoint;
//! use std::time::Duration;
//!
//! # fn example() -> inwx_core::Result<()> {
//! let client = ClientBuilder::new(Endpoint::Production)
//!     .http_client(HttpClient::builder().timeout(Duration::from_secs(30)).build())
//!     .with_default_observability()
//!     .service_name("dyndns")
//!     .build()?;
//! # Ok(())
//! # }
//! ```

use crate::{ClientMetrics, DomRobot, HttpClient};
use inwx_core::{Endpoint, Error, ObservabilityConfig, Result};
use std::sync::Arc;

/// Builder for configuring and creating a [`DomRobot`]
pub struct ClientBuilder {
    endpoint: Endpoint,
    http_client: Option<HttpClient>,
    observability_config: Option<ObservabilityConfig>,
    service_name: Option<String>,
    metrics: Option<Arc<ClientMetrics>>,
}

impl ClientBuilder {
    /// Create a new client builder
    pub fn new(endpoint: impl Into<Endpoint>) -> Self {
        Self {
            endpoint: endpoint.into(),
            http_client: None,
            observability_config: None,
            service_name: None,
            metrics: None,
        }
    }

    /// Use a caller-supplied HTTP client instead of a default one
    pub fn http_client(mut self, client: HttpClient) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Initialize OpenTelemetry with a custom configuration on build
    pub fn with_observability(mut self, config: ObservabilityConfig) -> Self {
        self.observability_config = Some(config);
        self
    }

    /// Initialize OpenTelemetry with the default configuration on build
    pub fn with_default_observability(mut self) -> Self {
        self.observability_config = Some(ObservabilityConfig::default());
        self
    }

    /// Set service name for observability (used if observability is enabled)
    pub fn service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = Some(name.into());
        self
    }

    /// Record metrics on these instruments
    ///
    /// Takes precedence over the instruments created for an observability
    /// config.
    pub fn with_metrics(mut self, metrics: Arc<ClientMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Build the client
    ///
    /// # Errors
    ///
    /// - `Error::InvalidUrl` for a malformed custom endpoint
    /// - `Error::Transport` if the default transport cannot be built
    /// - `Error::Internal` if OpenTelemetry initialization fails
    pub fn build(self) -> Result<DomRobot> {
        let mut client = DomRobot::new(self.endpoint.url(), self.http_client.unwrap_or_default())?;

        client.metrics = match self.observability_config {
            Some(mut config) => {
                if let Some(name) = self.service_name {
                    config.service_name = name;
                }

                inwx_core::init_observability(config.clone())
                    .map_err(|e| Error::Internal(format!("Failed to initialize observability: {}", e)))?;

                Some(
                    self.metrics
                        .unwrap_or_else(|| Arc::new(ClientMetrics::new(config.service_name))),
                )
            }
            None => self.metrics,
        };

        tracing::debug!(endpoint = %self.endpoint, "Client ready");
        Ok(client)
    }
}
