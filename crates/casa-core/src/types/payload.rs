//! Insertion-ordered client payloads.

use std::fmt;

use indexmap::IndexMap;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::value::FeatureValue;

/// Client-supplied feature dictionary.
///
/// Keys keep their insertion order. Inserting an existing key replaces its
/// value but keeps the position of the first occurrence, so iteration order
/// is stable and fuzzy matching tie-breaks deterministically.
#[derive(Debug, Clone, Default)]
pub struct RawPayload {
    entries: IndexMap<String, FeatureValue>,
}

impl RawPayload {
    /// Create an empty payload
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty payload with room for `capacity` entries
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity),
        }
    }

    /// Insert a value, returning the one it replaced
    pub fn insert(&mut self, key: impl Into<String>, value: FeatureValue) -> Option<FeatureValue> {
        self.entries.insert(key.into(), value)
    }

    /// Look up a value by exact key
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&FeatureValue> {
        self.entries.get(key)
    }

    /// Copy of this payload with every key lowercased.
    ///
    /// Keys that collide after folding collapse into one entry holding the
    /// last value, at the position of the first.
    #[must_use]
    pub fn case_folded(&self) -> Self {
        let mut folded = Self::with_capacity(self.entries.len());
        for (key, value) in &self.entries {
            folded.insert(key.to_lowercase(), value.clone());
        }
        folded
    }

    /// Iterate over entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FeatureValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterate over keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the payload has no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Equal when both hold the same entries in the same order
impl PartialEq for RawPayload {
    fn eq(&self, other: &Self) -> bool {
        self.entries.iter().eq(other.entries.iter())
    }
}

impl<K: Into<String>> FromIterator<(K, FeatureValue)> for RawPayload {
    fn from_iter<I: IntoIterator<Item = (K, FeatureValue)>>(iter: I) -> Self {
        let mut payload = Self::new();
        for (key, value) in iter {
            payload.insert(key, value);
        }
        payload
    }
}

impl Serialize for RawPayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for RawPayload {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PayloadVisitor;

        impl<'de> Visitor<'de> for PayloadVisitor {
            type Value = RawPayload;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of feature names to scalar values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<RawPayload, A::Error> {
                let mut payload = RawPayload::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, value)) = access.next_entry::<String, FeatureValue>()? {
                    payload.insert(key, value);
                }
                Ok(payload)
            }
        }

        deserializer.deserialize_map(PayloadVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preserves_insertion_order() {
        let payload: RawPayload =
            serde_json::from_str(r#"{"zeta": 1, "alpha": 2, "mid": 3}"#).unwrap();

        let keys: Vec<&str> = payload.keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut payload = RawPayload::new();
        payload.insert("a", FeatureValue::from(1));
        payload.insert("b", FeatureValue::from(2));

        let old = payload.insert("a", FeatureValue::from(9));
        assert_eq!(old, Some(FeatureValue::from(1)));
        assert_eq!(payload.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(payload.get("a"), Some(&FeatureValue::from(9)));
    }

    #[test]
    fn test_case_folding_collapses_duplicates() {
        let payload: RawPayload = [
            ("Area", FeatureValue::from(100)),
            ("Bath", FeatureValue::from(2)),
            ("AREA", FeatureValue::from(200)),
        ]
        .into_iter()
        .collect();

        let folded = payload.case_folded();
        assert_eq!(folded.len(), 2);
        assert_eq!(folded.keys().collect::<Vec<_>>(), vec!["area", "bath"]);
        assert_eq!(folded.get("area"), Some(&FeatureValue::from(200)));
    }

    #[test]
    fn test_serialize_round_trips_order() {
        let payload: RawPayload = [("b", FeatureValue::from(1)), ("a", FeatureValue::Null)]
            .into_iter()
            .collect();

        assert_eq!(serde_json::to_string(&payload).unwrap(), r#"{"b":1,"a":null}"#);
    }

    #[test]
    fn test_equality_is_order_sensitive() {
        let ab: RawPayload = [("a", FeatureValue::from(1)), ("b", FeatureValue::from(2))]
            .into_iter()
            .collect();
        let ba: RawPayload = [("b", FeatureValue::from(2)), ("a", FeatureValue::from(1))]
            .into_iter()
            .collect();
        assert_ne!(ab, ba);
        assert_eq!(ab, ab.clone());
    }

    #[test]
    fn test_large_payload_builds_in_linear_time() {
        let body = format!(
            "{{{}}}",
            (0..30_000)
                .map(|i| format!("\"feature_{i}\": {i}"))
                .collect::<Vec<_>>()
                .join(",")
        );

        let start = std::time::Instant::now();
        let payload: RawPayload = serde_json::from_str(&body).unwrap();
        let folded = payload.case_folded();
        let elapsed = start.elapsed();

        assert_eq!(folded.len(), 30_000);
        assert_eq!(folded.keys().next(), Some("feature_0"));
        assert_eq!(folded.get("feature_29999"), Some(&FeatureValue::from(29_999)));
        assert!(elapsed < std::time::Duration::from_secs(2), "took {elapsed:?}");
    }
}
