//! Prometheus metrics for the blog server.
//!
//! Counters:
//! - `blog_sessions_issued_total`: session tokens issued by the middleware
//! - `blog_logins_total`: successful logins
//! - `blog_request_errors_total{kind}`: error envelopes by error kind
//! - `blog_store_errors_total{procedure}`: failed stored-procedure calls
//!
//! # Example
//!
//! ```rust,no_run
//! use blog_web::config::Config;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::from_env();
//! let addr = blog_web::metrics::install(&config.metrics)?;
//! // Metrics available at http://{addr}/metrics
//! # Ok(())
//! # }
//! ```

use crate::config::MetricsConfig;
use metrics::describe_counter;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use thiserror::Error;

/// Errors from metrics setup.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// `METRICS_HOST`/`METRICS_PORT` do not form a socket address
    #[error("Invalid metrics address: {0}")]
    Address(String),
    /// Failed to install metrics exporter
    #[error("Failed to install metrics exporter: {0}")]
    Install(String),
}

/// Parse the exporter address.
///
/// # Errors
///
/// Returns [`MetricsError::Address`] if host and port are not a socket
/// address.
pub fn listen_address(config: &MetricsConfig) -> Result<SocketAddr, MetricsError> {
    let addr = config.bind_address();
    addr.parse().map_err(|_| MetricsError::Address(addr))
}

/// Install the Prometheus recorder and its scrape endpoint.
///
/// Must run inside a Tokio runtime and only once per process.
///
/// # Errors
///
/// Returns [`MetricsError`] if the address is invalid or a recorder is
/// already installed.
pub fn install(config: &MetricsConfig) -> Result<SocketAddr, MetricsError> {
    let addr = listen_address(config)?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| MetricsError::Install(e.to_string()))?;

    describe_metrics();
    tracing::info!(
        addr = %addr,
        "Metrics server started - available at http://{}/metrics",
        addr
    );
    Ok(addr)
}

fn describe_metrics() {
    describe_counter!(
        "blog_sessions_issued_total",
        "Total number of session tokens issued"
    );
    describe_counter!("blog_logins_total", "Total number of successful logins");
    describe_counter!(
        "blog_request_errors_total",
        "Total number of requests answered with an error envelope"
    );
    describe_counter!(
        "blog_store_errors_total",
        "Total number of failed storage procedure calls"
    );
}
