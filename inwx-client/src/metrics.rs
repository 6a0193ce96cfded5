//! Client metrics definitions
//!
//! OpenTelemetry instruments for DomRobot calls. They are recorded only when
//! the client was built with observability enabled (or with explicit
//! metrics) and exported through whatever meter provider is installed
//! globally.
//!
//! # Metrics Collected
//!
//! - **requests_total**: calls by method and outcome (counter)
//! - **request_duration**: round-trip latency in seconds (histogram)
//! - **errors_total**: failures by error category (counter)
//! - **api_errors_total**: API failures by result code (counter)
//! - **sessions_established**: successful logins (counter)

use opentelemetry::{
    global,
    metrics::{Counter, Histogram, Meter},
    KeyValue,
};

/// Client metrics for monitoring
pub struct ClientMetrics {
    /// Total number of calls
    pub requests_total: Counter<u64>,
    /// Call duration in seconds
    pub request_duration: Histogram<f64>,
    /// Total number of failed calls by error category
    pub errors_total: Counter<u64>,
    /// Total number of API failures by result code
    pub api_errors_total: Counter<u64>,
    /// Total number of successful logins
    pub sessions_established: Counter<u64>,
}

impl ClientMetrics {
    /// Create metrics on the global meter named after the service
    pub fn new(service_name: impl Into<String>) -> Self {
        let meter = global::meter_with_scope(
            opentelemetry::InstrumentationScope::builder(service_name.into())
                .with_version(env!("CARGO_PKG_VERSION"))
                .build(),
        );
        Self::new_with_meter(&meter)
    }

    /// Create metrics on a custom meter
    pub fn new_with_meter(meter: &Meter) -> Self {
        Self {
            requests_total: meter
                .u64_counter("inwx.client.requests.total")
                .with_description("Total number of DomRobot calls")
                .build(),
            request_duration: meter
                .f64_histogram("inwx.client.request.duration")
                .with_description("DomRobot call duration in seconds")
                .with_unit("s")
                .build(),
            errors_total: meter
                .u64_counter("inwx.client.errors.total")
                .with_description("Total number of failed calls by error category")
                .build(),
            api_errors_total: meter
                .u64_counter("inwx.client.api_errors.total")
                .with_description("Total number of API failures by result code")
                .build(),
            sessions_established: meter
                .u64_counter("inwx.client.sessions.established")
                .with_description("Total number of successful logins")
                .build(),
        }
    }

    /// Record a finished call
    pub fn record_request(&self, method: &str, status: &str, duration_secs: f64) {
        let attributes = &[
            KeyValue::new("method", method.to_string()),
            KeyValue::new("status", status.to_string()),
        ];
        self.requests_total.add(1, attributes);
        self.request_duration.record(duration_secs, attributes);
    }

    /// Record a failed call
    pub fn record_error(&self, error_type: &str) {
        self.errors_total
            .add(1, &[KeyValue::new("error_type", error_type.to_string())]);
    }

    /// Record an API failure code
    pub fn record_api_error(&self, method: &str, code: i64) {
        let attributes = &[
            KeyValue::new("method", method.to_string()),
            KeyValue::new("code", code),
        ];
        self.api_errors_total.add(1, attributes);
    }

    /// Record a successful login
    pub fn record_session(&self) {
        self.sessions_established.add(1, &[]);
    }
}

impl std::fmt::Debug for ClientMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientMetrics").finish_non_exhaustive()
    }
}
