//! Prediction results returned to clients.

use serde::{Deserialize, Serialize};

use crate::constants::{CURRENCY, MODEL_VERSION};

/// A single predicted price with fixed metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Estimated house price
    pub predicted_price: f64,
    /// Currency of the estimate
    pub currency: String,
    /// Label of the model that produced the estimate
    pub model_version: String,
}

impl PredictionResult {
    /// Wrap a raw model output with the service's metadata
    #[must_use]
    pub fn new(predicted_price: f64) -> Self {
        Self {
            predicted_price,
            currency: CURRENCY.to_string(),
            model_version: MODEL_VERSION.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_shape() {
        let result = PredictionResult::new(4_250_000.5);
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["predicted_price"], 4_250_000.5);
        assert_eq!(json["currency"], "INR");
        assert_eq!(json["model_version"], "xgboost_refined_v1");
    }
}
