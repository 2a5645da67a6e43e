//! Prediction service: normalization followed by model inference.

use std::time::{Duration, Instant};

use casa_core::error::{Error, Result};
use casa_core::types::RawPayload;

use crate::artifacts::ArtifactStore;
use crate::normalizer::{Normalized, PayloadNormalizer};

/// A prediction together with how it was obtained
#[derive(Debug, Clone, PartialEq)]
pub struct Estimate {
    /// Predicted price
    pub value: f64,
    /// Features that defaulted to zero
    pub missing: Vec<String>,
    /// Location values with no known encoding
    pub unseen: usize,
    /// Time spent in model inference
    pub latency: Duration,
}

/// Orchestrates normalization and inference over the shared artifacts
#[derive(Debug)]
pub struct PredictionService {
    store: ArtifactStore,
}

impl PredictionService {
    /// Create a service owning the loaded artifacts
    #[must_use]
    pub fn new(store: ArtifactStore) -> Self {
        Self { store }
    }

    /// Loaded artifacts
    #[must_use]
    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    /// Normalizer bound to this service's schema and encoder
    #[must_use]
    pub fn normalizer(&self) -> PayloadNormalizer<'_> {
        PayloadNormalizer::new(self.store.schema(), self.store.encoder())
    }

    /// Predict a price and report the fallbacks taken
    pub fn estimate(&self, payload: &RawPayload) -> Result<Estimate> {
        let Normalized {
            row,
            missing,
            unseen,
        } = self.normalizer().normalize(payload);

        let start = Instant::now();
        let outputs = self.store.model().predict(&row)?;
        let latency = start.elapsed();

        let value = outputs
            .first()
            .copied()
            .ok_or_else(|| Error::Model("model returned no predictions".to_string()))?;

        Ok(Estimate {
            value,
            missing,
            unseen,
            latency,
        })
    }

    /// Predict a price for a raw payload
    pub fn predict(&self, payload: &RawPayload) -> Result<f64> {
        self.estimate(payload).map(|estimate| estimate.value)
    }
}
