//! Fitted label encoder for categorical features.

use std::path::Path;

use casa_core::error::{Error, Result};
use casa_core::traits::CategoryEncoder;
use serde::Deserialize;

/// Label encoder mapping known categories to their index in sorted order.
///
/// Codes match a fitted scikit-learn `LabelEncoder`, whose `classes_` are
/// sorted and unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EncoderDocument {
    Classes { classes: Vec<String> },
    Bare(Vec<String>),
}

impl LabelEncoder {
    /// Fit an encoder to the given categories
    pub fn new<I, S>(classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut classes: Vec<String> = classes.into_iter().map(Into::into).collect();
        classes.sort_unstable();
        classes.dedup();
        Self { classes }
    }

    /// Parse `{"classes": [...]}` or a bare JSON array of categories
    pub fn from_json_str(json: &str) -> Result<Self> {
        let classes = match serde_json::from_str::<EncoderDocument>(json)? {
            EncoderDocument::Classes { classes } | EncoderDocument::Bare(classes) => classes,
        };
        Ok(Self::new(classes))
    }

    /// Load an encoder document from disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Known categories in code order
    #[must_use]
    pub fn classes(&self) -> &[String] {
        &self.classes
    }
}

impl CategoryEncoder for LabelEncoder {
    fn transform(&self, category: &str) -> Result<i64> {
        self.classes
            .binary_search_by(|class| class.as_str().cmp(category))
            .map(|idx| idx as i64)
            .map_err(|_| Error::UnseenCategory(category.to_string()))
    }

    fn len(&self) -> usize {
        self.classes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_follow_sorted_order() {
        let encoder = LabelEncoder::new(["Whitefield", "Indiranagar", "Hebbal", "Indiranagar"]);

        assert_eq!(encoder.len(), 3);
        assert_eq!(encoder.transform("Hebbal").unwrap(), 0);
        assert_eq!(encoder.transform("Indiranagar").unwrap(), 1);
        assert_eq!(encoder.transform("Whitefield").unwrap(), 2);
    }

    #[test]
    fn test_unseen_category_fails() {
        let encoder = LabelEncoder::new(["Hebbal"]);
        assert_eq!(
            encoder.transform("hebbal"),
            Err(Error::UnseenCategory("hebbal".to_string()))
        );
    }

    #[test]
    fn test_parse_both_document_shapes() {
        let wrapped = LabelEncoder::from_json_str(r#"{"classes": ["b", "a"]}"#).unwrap();
        let bare = LabelEncoder::from_json_str(r#"["b", "a"]"#).unwrap();

        assert_eq!(wrapped, bare);
        assert_eq!(wrapped.classes(), ["a", "b"]);
    }
}
