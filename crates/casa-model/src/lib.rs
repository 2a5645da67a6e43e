//! # casa-model
//!
//! Artifact loading and price inference for the casa service.
//!
//! This crate provides:
//! - Loaders for the feature schema, label encoder and XGBoost JSON model
//! - Payload normalization onto the model's fixed input schema
//! - The prediction service that ties normalization to inference
//!
//! ## Example
//!
//! ```rust,ignore
//! use casa_model::artifacts::{ArtifactPaths, ArtifactStore};
//! use casa_model::predictor::PredictionService;
//!
//! let store = ArtifactStore::load(&ArtifactPaths::default())?;
//! let service = PredictionService::new(store);
//! let price = service.predict(&payload)?;
//! ```

#![warn(missing_docs, rust_2018_idioms, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::cast_precision_loss)]

pub mod artifacts;
pub mod booster;
pub mod encoder;
pub mod normalizer;
pub mod predictor;
pub mod schema;

pub use artifacts::{ArtifactPaths, ArtifactStore};
pub use booster::TreeEnsemble;
pub use encoder::LabelEncoder;
pub use normalizer::{Normalized, PayloadNormalizer, Resolution};
pub use predictor::{Estimate, PredictionService};
pub use schema::FeatureSchema;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::artifacts::{ArtifactPaths, ArtifactStore};
    pub use crate::normalizer::{Normalized, PayloadNormalizer};
    pub use crate::predictor::{Estimate, PredictionService};
    pub use crate::schema::FeatureSchema;
}
