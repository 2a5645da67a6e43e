//! # casa-core
//!
//! Core types, traits, and errors for the casa house-price service.
//!
//! This crate provides:
//! - Payload types: `FeatureValue`, `RawPayload`
//! - Model input types: `Cell`, `NormalizedRow`
//! - Response metadata: `PredictionResult`
//! - Seams for the opaque artifacts: `Regressor`, `CategoryEncoder`
//!
//! ## Example
//!
//! ```rust
//! use casa_core::types::{FeatureValue, RawPayload};
//!
//! let mut payload = RawPayload::new();
//! payload.insert("area", FeatureValue::from("1200"));
//! payload.insert("bedrooms", FeatureValue::from(3));
//! assert_eq!(payload.len(), 2);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod constants;
pub mod error;
pub mod traits;
pub mod types;

pub use constants::*;
pub use error::{Error, Result};
pub use traits::*;
pub use types::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::constants::*;
    pub use crate::error::{Error, Result};
    pub use crate::traits::*;
    pub use crate::types::*;
}
