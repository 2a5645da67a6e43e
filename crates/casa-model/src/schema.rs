//! Ordered canonical feature names the model was trained on.

use std::collections::HashSet;
use std::path::Path;

use casa_core::error::{Error, Result};

/// Immutable, ordered list of canonical feature names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSchema {
    names: Vec<String>,
}

impl FeatureSchema {
    /// Build a schema from names, rejecting empty and duplicated lists
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(Error::Schema("feature list is empty".to_string()));
        }

        let mut seen = HashSet::with_capacity(names.len());
        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(Error::Schema(format!("duplicate feature '{name}'")));
            }
        }

        Ok(Self { names })
    }

    /// Parse a JSON array of feature names
    pub fn from_json_str(json: &str) -> Result<Self> {
        let names: Vec<String> = serde_json::from_str(json)?;
        Self::new(names)
    }

    /// Load a schema document from disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Feature names in model order
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Iterate over feature names in model order
    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.names.iter()
    }

    /// Number of features
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Always false for a constructed schema
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keeps_order() {
        let schema = FeatureSchema::from_json_str(r#"["area", "bedrooms", "location_enc"]"#).unwrap();
        assert_eq!(schema.names(), ["area", "bedrooms", "location_enc"]);
        assert_eq!(schema.len(), 3);
    }

    #[test]
    fn test_rejects_empty_and_duplicates() {
        assert!(matches!(
            FeatureSchema::from_json_str("[]"),
            Err(Error::Schema(_))
        ));
        assert!(matches!(
            FeatureSchema::new(["area", "area"]),
            Err(Error::Schema(_))
        ));
    }

    #[test]
    fn test_rejects_non_string_entries() {
        assert!(matches!(
            FeatureSchema::from_json_str("[1, 2]"),
            Err(Error::Serialization(_))
        ));
    }
}
