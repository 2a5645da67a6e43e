//! Core domain types for the price service.

mod payload;
mod prediction;
mod row;
mod value;

pub use payload::RawPayload;
pub use prediction::PredictionResult;
pub use row::{Cell, NormalizedRow};
pub use value::FeatureValue;
