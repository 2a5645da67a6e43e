//! Payload normalization onto the model's canonical feature schema.
//!
//! Each canonical feature is resolved against the case-folded payload in
//! this order, the first rule that applies wins:
//!
//! 1. Location-like features (name contains `location`, `locality` or
//!    `city`) take the first truthy value among the `location`, `city` and
//!    `locality` keys, falling back to a non-null `locality`, and run it
//!    through the encoder. They never use the generic rules below.
//! 2. A payload key equal to the feature name.
//! 3. The first payload key, in insertion order, that contains or is
//!    contained in the feature name.
//! 4. Otherwise the feature defaults to `0` and a warning is logged.
//!
//! Resolved values are then coerced: booleans become `0`/`1`, numeric
//! strings become integers or floats, anything else is kept as is.

use casa_core::constants::{DEFAULT_FILL, LOCATION_ALIASES, LOCATION_MARKERS};
use casa_core::traits::CategoryEncoder;
use casa_core::types::{Cell, FeatureValue, NormalizedRow, RawPayload};

use crate::schema::FeatureSchema;

/// Outcome of resolving one canonical feature against a payload
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<'p> {
    /// Location value known to the encoder
    Encoded(i64),
    /// Location value the encoder rejected, or one that is not a string
    UnseenCategory,
    /// Payload value found by direct or fuzzy key match
    Matched(&'p FeatureValue),
    /// Nothing usable in the payload
    Missing,
}

/// A normalized row together with the fallbacks taken to build it
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    /// One cell per schema feature, in schema order
    pub row: NormalizedRow,
    /// Features that defaulted to zero, each logged once
    pub missing: Vec<String>,
    /// Location features whose value had no known encoding
    pub unseen: usize,
}

/// Maps loosely-typed payloads onto a fixed feature schema
#[derive(Clone, Copy)]
pub struct PayloadNormalizer<'a> {
    schema: &'a FeatureSchema,
    encoder: &'a dyn CategoryEncoder,
}

impl<'a> PayloadNormalizer<'a> {
    /// Create a normalizer over a schema and encoder
    #[must_use]
    pub fn new(schema: &'a FeatureSchema, encoder: &'a dyn CategoryEncoder) -> Self {
        Self { schema, encoder }
    }

    /// Build the model row for a payload.
    ///
    /// Never fails: every schema feature gets exactly one cell.
    #[must_use]
    pub fn normalize(&self, payload: &RawPayload) -> Normalized {
        let folded = payload.case_folded();
        let mut row = NormalizedRow::with_capacity(self.schema.len());
        let mut missing = Vec::new();
        let mut unseen = 0;

        for feature in self.schema.iter() {
            let cell = match self.resolve(&feature.to_lowercase(), &folded) {
                Resolution::Encoded(code) => Cell::Int(code),
                Resolution::UnseenCategory => {
                    unseen += 1;
                    Cell::Int(DEFAULT_FILL)
                }
                Resolution::Matched(value) => coerce(value),
                Resolution::Missing => {
                    tracing::warn!("Missing feature '{}', defaulting to 0", feature);
                    missing.push(feature.clone());
                    Cell::Int(DEFAULT_FILL)
                }
            };
            row.push(feature.clone(), cell);
        }

        Normalized {
            row,
            missing,
            unseen,
        }
    }

    /// Resolve a lowercased feature name against a case-folded payload
    #[must_use]
    pub fn resolve<'p>(&self, feature: &str, folded: &'p RawPayload) -> Resolution<'p> {
        if is_location_feature(feature) {
            return match location_value(folded) {
                Some(value) => self.encode(value),
                None => Resolution::Missing,
            };
        }

        let matched = folded
            .get(feature)
            .or_else(|| fuzzy_match(feature, folded));

        match matched {
            Some(value) if !value.is_null() => Resolution::Matched(value),
            _ => Resolution::Missing,
        }
    }

    fn encode(&self, value: &FeatureValue) -> Resolution<'static> {
        let Some(category) = value.as_text() else {
            return Resolution::UnseenCategory;
        };
        match self.encoder.transform(category) {
            Ok(code) => Resolution::Encoded(code),
            Err(_) => Resolution::UnseenCategory,
        }
    }
}

/// Check if a lowercased feature name is location-like
#[must_use]
pub fn is_location_feature(feature: &str) -> bool {
    LOCATION_MARKERS.iter().any(|marker| feature.contains(marker))
}

/// First truthy value among the location aliases, in priority order.
///
/// When none is truthy the last alias is used as long as it is present and
/// not null, so a falsy `locality` still reaches the encoder.
fn location_value(folded: &RawPayload) -> Option<&FeatureValue> {
    let (last, preferred) = LOCATION_ALIASES.split_last()?;
    preferred
        .iter()
        .filter_map(|alias| folded.get(alias))
        .find(|value| value.is_truthy())
        .or_else(|| folded.get(last).filter(|value| !value.is_null()))
}

/// First key, in insertion order, related to the feature by containment.
///
/// The first qualifying key wins even when its value is `null`.
fn fuzzy_match<'p>(feature: &str, folded: &'p RawPayload) -> Option<&'p FeatureValue> {
    folded
        .iter()
        .find(|(key, _)| feature.contains(key) || key.contains(feature))
        .map(|(_, value)| value)
}

/// Coerce a resolved payload value into a model cell
#[must_use]
pub fn coerce(value: &FeatureValue) -> Cell {
    match value {
        FeatureValue::Null => Cell::Int(DEFAULT_FILL),
        FeatureValue::Bool(b) => Cell::Int(i64::from(*b)),
        FeatureValue::Number(n) => match n.as_i64() {
            Some(i) => Cell::Int(i),
            None => Cell::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        FeatureValue::Text(text) => parse_numeric(text).unwrap_or_else(|| Cell::Text(text.clone())),
    }
}

/// Parse a numeric-looking string.
///
/// Accepts an optional leading `-`, digits and at most one `.`. Returns
/// `None` when the text does not look numeric or does not fit the target
/// type; callers keep the original text in that case.
#[must_use]
pub fn parse_numeric(text: &str) -> Option<Cell> {
    if !looks_numeric(text) {
        return None;
    }
    if text.contains('.') {
        text.parse::<f64>().ok().map(Cell::Float)
    } else {
        text.parse::<i64>().ok().map(Cell::Int)
    }
}

fn looks_numeric(text: &str) -> bool {
    let without_point = text.replacen('.', "", 1);
    let digits = without_point.trim_start_matches('-');
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}
