//! Constants used throughout the casa price service.

/// Currency reported alongside every prediction
pub const CURRENCY: &str = "INR";

/// Model version label reported alongside every prediction
pub const MODEL_VERSION: &str = "xgboost_refined_v1";

/// Substrings that mark a canonical feature as location-like
pub const LOCATION_MARKERS: [&str; 3] = ["location", "locality", "city"];

/// Payload keys searched, in priority order, for a location value
pub const LOCATION_ALIASES: [&str; 3] = ["location", "city", "locality"];

/// Value used for missing features and unseen categories
pub const DEFAULT_FILL: i64 = 0;

/// Detail message returned to clients when a prediction fails
pub const PREDICTION_FAILED: &str = "Prediction failed";
