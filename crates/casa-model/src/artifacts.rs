//! Read-only store of the artifacts loaded at startup.

use std::fmt;
use std::path::{Path, PathBuf};

use casa_core::error::{Error, Result};
use casa_core::traits::{CategoryEncoder, Regressor};
use serde::{Deserialize, Serialize};

use crate::booster::TreeEnsemble;
use crate::encoder::LabelEncoder;
use crate::schema::FeatureSchema;

/// Locations of the artifact files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactPaths {
    /// XGBoost JSON model
    pub model_path: PathBuf,
    /// Label encoder classes
    pub encoder_path: PathBuf,
    /// Ordered feature names
    pub features_path: PathBuf,
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("artifacts/xgboost_model_refined.json"),
            encoder_path: PathBuf::from("artifacts/label_encoder.json"),
            features_path: PathBuf::from("data/features.json"),
        }
    }
}

impl ArtifactPaths {
    /// Resolve relative paths against `base`
    #[must_use]
    pub fn rooted_at<P: AsRef<Path>>(&self, base: P) -> Self {
        let base = base.as_ref();
        Self {
            model_path: base.join(&self.model_path),
            encoder_path: base.join(&self.encoder_path),
            features_path: base.join(&self.features_path),
        }
    }
}

/// Model, encoder and schema shared by every request.
///
/// Nothing here is mutated after construction, so a single instance can be
/// shared across worker threads without locking.
pub struct ArtifactStore {
    schema: FeatureSchema,
    model: Box<dyn Regressor>,
    encoder: Box<dyn CategoryEncoder>,
}

impl ArtifactStore {
    /// Assemble a store from already loaded parts
    pub fn new<M, E>(schema: FeatureSchema, model: M, encoder: E) -> Self
    where
        M: Regressor + 'static,
        E: CategoryEncoder + 'static,
    {
        Self {
            schema,
            model: Box::new(model),
            encoder: Box::new(encoder),
        }
    }

    /// Load all three artifacts from disk
    pub fn load(paths: &ArtifactPaths) -> Result<Self> {
        tracing::info!("Loading model and encoder");

        let model = TreeEnsemble::load(&paths.model_path).map_err(|e| at(&paths.model_path, e))?;
        let encoder =
            LabelEncoder::load(&paths.encoder_path).map_err(|e| at(&paths.encoder_path, e))?;
        let schema =
            FeatureSchema::load(&paths.features_path).map_err(|e| at(&paths.features_path, e))?;

        tracing::info!(
            trees = model.num_trees(),
            categories = encoder.classes().len(),
            features = schema.len(),
            "Artifacts loaded"
        );

        let store = Self::new(schema, model, encoder);
        store.check_alignment();
        Ok(store)
    }

    /// Warn when the schema disagrees with the names recorded in the model.
    ///
    /// A mismatch is not fatal at startup; every prediction will fail instead.
    fn check_alignment(&self) {
        if let Some(names) = self.model.feature_names() {
            if names != self.schema.names() {
                tracing::warn!(
                    model = ?names,
                    schema = ?self.schema.names(),
                    "Feature schema does not match model feature names"
                );
            }
        }
    }

    /// Canonical feature schema
    #[must_use]
    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Trained regression model
    #[must_use]
    pub fn model(&self) -> &dyn Regressor {
        self.model.as_ref()
    }

    /// Fitted categorical encoder
    #[must_use]
    pub fn encoder(&self) -> &dyn CategoryEncoder {
        self.encoder.as_ref()
    }
}

impl fmt::Debug for ArtifactStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArtifactStore")
            .field("schema", &self.schema)
            .field("categories", &self.encoder.len())
            .finish_non_exhaustive()
    }
}

/// Prefix an I/O or parse error with the artifact path
fn at(path: &Path, err: Error) -> Error {
    let location = path.display();
    match err {
        Error::Io(msg) => Error::Io(format!("{location}: {msg}")),
        Error::Serialization(msg) => Error::Serialization(format!("{location}: {msg}")),
        Error::Schema(msg) => Error::Schema(format!("{location}: {msg}")),
        Error::Model(msg) => Error::Model(format!("{location}: {msg}")),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booster::tests::TWO_STUMPS;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("casa-{}-{name}", std::process::id()));
        std::fs::create_dir_all(dir.join("artifacts")).unwrap();
        std::fs::create_dir_all(dir.join("data")).unwrap();
        dir
    }

    fn write_artifacts(dir: &Path, features: &str) -> ArtifactPaths {
        let paths = ArtifactPaths::default().rooted_at(dir);
        std::fs::write(&paths.model_path, TWO_STUMPS).unwrap();
        std::fs::write(&paths.encoder_path, r#"{"classes": ["Hebbal", "Whitefield"]}"#).unwrap();
        std::fs::write(&paths.features_path, features).unwrap();
        paths
    }

    #[test]
    fn test_load_from_disk() {
        let dir = scratch_dir("load");
        let paths = write_artifacts(&dir, r#"["area", "bedrooms", "location_enc"]"#);

        let store = ArtifactStore::load(&paths).unwrap();
        assert_eq!(store.schema().len(), 3);
        assert_eq!(store.encoder().transform("Whitefield").unwrap(), 1);
        assert!(store.model().feature_names().is_some());

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_missing_file_names_the_path() {
        let dir = scratch_dir("missing");
        let paths = write_artifacts(&dir, "[]");
        std::fs::remove_file(&paths.model_path).unwrap();

        let err = ArtifactStore::load(&paths).unwrap_err();
        assert!(matches!(err, Error::Io(msg) if msg.contains("xgboost_model_refined.json")));

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_empty_schema_is_rejected() {
        let dir = scratch_dir("empty-schema");
        let paths = write_artifacts(&dir, "[]");

        assert!(matches!(ArtifactStore::load(&paths), Err(Error::Schema(_))));

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_default_paths() {
        let paths = ArtifactPaths::default().rooted_at("/srv/casa");
        assert_eq!(
            paths.features_path,
            PathBuf::from("/srv/casa/data/features.json")
        );
    }
}
