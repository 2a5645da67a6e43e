//! Prometheus metrics for monitoring.

use prometheus_client::encoding::text::encode;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::histogram::{exponential_buckets, Histogram};
use prometheus_client::registry::Registry;

use casa_model::predictor::Estimate;

/// Metrics registry for the prediction service.
///
/// Counter names are registered without the `_total` suffix; the encoder
/// appends it.
#[derive(Debug)]
pub struct MetricsRegistry {
    registry: Registry,
    /// Prediction requests received
    pub requests: Counter,
    /// Successful predictions
    pub predictions: Counter,
    /// Failed predictions
    pub prediction_failures: Counter,
    /// Features defaulted to zero
    pub missing_features: Counter,
    /// Location values without a known encoding
    pub unseen_categories: Counter,
    /// Inference latency histogram (microseconds)
    pub inference_latency_us: Histogram,
}

impl Default for MetricsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsRegistry {
    /// Create a new metrics registry
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Registry::default();

        let requests = Counter::default();
        registry.register(
            "casa_requests",
            "Total prediction requests received",
            requests.clone(),
        );

        let predictions = Counter::default();
        registry.register(
            "casa_predictions",
            "Total successful predictions",
            predictions.clone(),
        );

        let prediction_failures = Counter::default();
        registry.register(
            "casa_prediction_failures",
            "Total failed predictions",
            prediction_failures.clone(),
        );

        let missing_features = Counter::default();
        registry.register(
            "casa_missing_features",
            "Features filled with the default value",
            missing_features.clone(),
        );

        let unseen_categories = Counter::default();
        registry.register(
            "casa_unseen_categories",
            "Location values not known to the encoder",
            unseen_categories.clone(),
        );

        // 1us to ~0.5s
        let inference_latency_us = Histogram::new(exponential_buckets(1.0, 2.0, 20));
        registry.register(
            "casa_inference_latency_us",
            "Model inference latency in microseconds",
            inference_latency_us.clone(),
        );

        Self {
            registry,
            requests,
            predictions,
            prediction_failures,
            missing_features,
            unseen_categories,
            inference_latency_us,
        }
    }

    /// Record an incoming prediction request
    pub fn record_request(&self) {
        self.requests.inc();
    }

    /// Record a successful prediction
    pub fn record_prediction(&self, estimate: &Estimate) {
        self.predictions.inc();
        self.missing_features.inc_by(estimate.missing.len() as u64);
        self.unseen_categories.inc_by(estimate.unseen as u64);
        self.inference_latency_us
            .observe(estimate.latency.as_secs_f64() * 1e6);
    }

    /// Record a failed prediction
    pub fn record_failure(&self) {
        self.prediction_failures.inc();
    }

    /// Encode metrics in the Prometheus text format
    pub fn encode(&self) -> Result<String, std::fmt::Error> {
        let mut buffer = String::new();
        encode(&mut buffer, &self.registry)?;
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_metrics_creation() {
        let metrics = MetricsRegistry::new();

        metrics.record_request();
        metrics.record_prediction(&Estimate {
            value: 42.0,
            missing: vec!["area".to_string(), "bedrooms".to_string()],
            unseen: 1,
            latency: Duration::from_micros(120),
        });
        metrics.record_failure();

        let output = metrics.encode().unwrap();
        assert!(output.contains("casa_requests_total 1"));
        assert!(output.contains("casa_predictions_total 1"));
        assert!(output.contains("casa_missing_features_total 2"));
        assert!(output.contains("casa_unseen_categories_total 1"));
        assert!(output.contains("casa_prediction_failures_total 1"));
        assert!(output.contains("casa_inference_latency_us_count 1"));
    }
}
