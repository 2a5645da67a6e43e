//! Core traits for the price service.
//!
//! The trained artifacts are opaque to the rest of the system; these traits
//! are the only surface the normalizer and prediction service rely on.

use crate::error::Result;
use crate::types::NormalizedRow;

/// Trait for trained regression models
pub trait Regressor: Send + Sync {
    /// Predict over a single-row table keyed by the schema's column names.
    ///
    /// Returns one value per row, so a well-formed model yields exactly one.
    fn predict(&self, row: &NormalizedRow) -> Result<Vec<f64>>;

    /// Column names the model was trained on, when recorded in the artifact
    fn feature_names(&self) -> Option<&[String]> {
        None
    }
}

/// Trait for fitted categorical encoders
pub trait CategoryEncoder: Send + Sync {
    /// Map a category to its integer code.
    ///
    /// Fails with [`Error::UnseenCategory`](crate::Error::UnseenCategory)
    /// for values the encoder was never fitted on.
    fn transform(&self, category: &str) -> Result<i64>;

    /// Number of known categories
    fn len(&self) -> usize;

    /// Whether the encoder knows no categories at all
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
