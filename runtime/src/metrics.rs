//! Prometheus metrics for the Store.
//!
//! The Store records through the `metrics` facade, which is a no-op until a
//! recorder is installed. [`PrometheusExporter::install`] installs one and
//! renders the exposition text on demand; there is no HTTP listener.
//!
//! Recorded metrics:
//! - `store_actions_dispatched_total{action}`
//! - `store_notifications_total`
//! - `store_feedback_limit_exceeded_total`
//! - `store_reduce_duration_seconds`
//!
//! # Example
//!
//! ```rust,no_run
//! use tidy_runtime::metrics::PrometheusExporter;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let exporter = PrometheusExporter::install()?;
//! // ... dispatch some actions ...
//! println!("{}", exporter.render());
//! # Ok(())
//! # }
//! ```

use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use thiserror::Error;

/// Errors from metrics operations.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Failed to build metrics exporter
    #[error("Failed to build metrics exporter: {0}")]
    Build(String),
    /// Failed to install metrics exporter
    #[error("Failed to install metrics exporter: {0}")]
    Install(String),
}

/// Prometheus recorder with an in-process render handle
pub struct PrometheusExporter {
    handle: PrometheusHandle,
}

impl PrometheusExporter {
    /// Describe the Store metrics and install the global Prometheus recorder.
    ///
    /// # Errors
    ///
    /// Returns [`MetricsError`] if the exporter cannot be built, or if a global
    /// recorder is already installed.
    pub fn install() -> Result<Self, MetricsError> {
        let builder = PrometheusBuilder::new()
            .set_buckets_for_metric(
                Matcher::Suffix("duration_seconds".to_string()),
                &[0.000_001, 0.000_01, 0.000_1, 0.001, 0.01, 0.1],
            )
            .map_err(|e| MetricsError::Build(e.to_string()))?;

        let handle = builder
            .install_recorder()
            .map_err(|e| MetricsError::Install(e.to_string()))?;

        // Descriptions only stick once a recorder is installed
        register_metrics();
        tracing::info!("Prometheus recorder installed");

        Ok(Self { handle })
    }

    /// Render current metrics in Prometheus exposition format.
    #[must_use]
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

impl std::fmt::Debug for PrometheusExporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrometheusExporter").finish_non_exhaustive()
    }
}

/// Register all metric descriptions.
pub fn register_metrics() {
    describe_counter!(
        "store_actions_dispatched_total",
        "Total number of actions reduced by the store, by action type"
    );
    describe_counter!(
        "store_notifications_total",
        "Total number of subscriber callbacks invoked"
    );
    describe_counter!(
        "store_feedback_limit_exceeded_total",
        "Total number of sends aborted by the effect feedback limit"
    );
    describe_histogram!(
        "store_reduce_duration_seconds",
        metrics::Unit::Seconds,
        "Time taken by a single reduction"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exporter_renders_store_metrics() {
        let exporter = PrometheusExporter::install().unwrap();

        metrics::counter!("store_actions_dispatched_total", "action" => "ADD_TODO").increment(2);
        metrics::histogram!("store_reduce_duration_seconds").record(0.000_5);

        let rendered = exporter.render();
        assert!(rendered.contains(r#"store_actions_dispatched_total{action="ADD_TODO"} 2"#));
        assert!(rendered.contains("store_reduce_duration_seconds_bucket"));

        // Only one global recorder per process
        assert!(matches!(PrometheusExporter::install(), Err(MetricsError::Install(_))));
    }
}
