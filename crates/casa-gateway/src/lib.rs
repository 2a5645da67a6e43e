//! # casa-gateway
//!
//! HTTP surface, configuration, and monitoring for the casa price service.
//!
//! This crate provides:
//! - `/health`, `/predict` and `/metrics` endpoints
//! - TOML configuration with environment overrides
//! - Logging bootstrap
//! - Prometheus metrics export

#![warn(missing_docs, rust_2018_idioms, clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod server;

pub use config::AppConfig;
pub use error::ApiError;
pub use metrics::MetricsRegistry;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::AppConfig;
    pub use crate::error::ApiError;
    pub use crate::metrics::MetricsRegistry;
    pub use crate::server::AppState;
}
