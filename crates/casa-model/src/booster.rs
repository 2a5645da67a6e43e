//! Gradient-boosted tree ensemble loaded from XGBoost's JSON model format.
//!
//! Only the pieces needed for regression inference are read:
//!
//! ```text
//! learner.attributes.best_iteration     last round kept by early stopping
//! learner.feature_names                 optional column names
//! learner.learner_model_param.base_score global bias, "5E-1" or "[5E-1]"
//! learner.objective.name                 selects the output transform
//! learner.gradient_booster.model.trees   one entry per boosted tree
//! ```
//!
//! Each tree is stored as parallel arrays indexed by node id. A node whose
//! left child is `-1` is a leaf, and its `split_conditions` entry holds the
//! leaf weight.

use std::path::Path;

use casa_core::error::{Error, Result};
use casa_core::traits::Regressor;
use casa_core::types::{Cell, NormalizedRow};
use serde::Deserialize;

#[derive(Deserialize)]
struct ModelDocument {
    learner: LearnerDocument,
}

#[derive(Deserialize)]
struct LearnerDocument {
    #[serde(default)]
    attributes: LearnerAttributes,
    #[serde(default)]
    feature_names: Vec<String>,
    gradient_booster: BoosterDocument,
    learner_model_param: LearnerParams,
    objective: ObjectiveDocument,
}

#[derive(Deserialize, Default)]
struct LearnerAttributes {
    #[serde(default)]
    best_iteration: Option<String>,
}

#[derive(Deserialize)]
struct BoosterDocument {
    name: String,
    #[serde(default)]
    model: Option<GbTreeDocument>,
}

#[derive(Deserialize)]
struct GbTreeDocument {
    #[serde(default)]
    gbtree_model_param: Option<GbTreeParams>,
    trees: Vec<TreeDocument>,
}

#[derive(Deserialize)]
struct GbTreeParams {
    num_parallel_tree: String,
}

#[derive(Deserialize)]
struct TreeDocument {
    left_children: Vec<i32>,
    right_children: Vec<i32>,
    split_indices: Vec<u32>,
    split_conditions: Vec<f32>,
    default_left: Vec<Flag>,
    #[serde(default)]
    split_type: Vec<u8>,
}

/// Older writers emit `default_left` as 0/1, newer ones as booleans
#[derive(Deserialize, Clone, Copy)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Int(u8),
}

impl Flag {
    fn is_set(self) -> bool {
        match self {
            Flag::Bool(b) => b,
            Flag::Int(i) => i != 0,
        }
    }
}

#[derive(Deserialize)]
struct LearnerParams {
    base_score: String,
    #[serde(default)]
    num_feature: Option<String>,
}

#[derive(Deserialize)]
struct ObjectiveDocument {
    name: String,
}

/// Transform from summed margin to prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Link {
    /// Squared error and friends
    Identity,
    /// Log-link objectives such as `reg:gamma` and `count:poisson`
    Exp,
    /// Logistic objectives
    Logistic,
}

impl Link {
    /// Select the link for an XGBoost objective name
    pub fn for_objective(name: &str) -> Result<Self> {
        match name {
            "reg:squarederror" | "reg:linear" | "reg:squaredlogerror" | "reg:pseudohubererror"
            | "reg:absoluteerror" | "reg:quantileerror" => Ok(Link::Identity),
            "reg:gamma" | "reg:tweedie" | "count:poisson" => Ok(Link::Exp),
            "reg:logistic" | "binary:logistic" => Ok(Link::Logistic),
            other => Err(Error::Model(format!("unsupported objective '{other}'"))),
        }
    }

    /// Convert a `base_score` from output space into margin space
    fn to_margin(self, base_score: f32) -> f32 {
        match self {
            Link::Identity => base_score,
            Link::Exp => base_score.ln(),
            Link::Logistic => (base_score / (1.0 - base_score)).ln(),
        }
    }

    fn apply(self, margin: f32) -> f32 {
        match self {
            Link::Identity => margin,
            Link::Exp => margin.exp(),
            Link::Logistic => 1.0 / (1.0 + (-margin).exp()),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Node {
    left: i32,
    right: i32,
    feature: u32,
    /// Split threshold, or the leaf weight for leaves
    value: f32,
    default_left: bool,
}

impl Node {
    #[inline]
    fn is_leaf(&self) -> bool {
        self.left == -1
    }
}

/// A single regression tree
#[derive(Debug, Clone)]
struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    fn from_document(idx: usize, doc: TreeDocument) -> Result<Self> {
        let n = doc.left_children.len();
        if doc.right_children.len() != n
            || doc.split_indices.len() != n
            || doc.split_conditions.len() != n
            || doc.default_left.len() != n
        {
            return Err(Error::Model(format!("tree {idx}: node arrays differ in length")));
        }
        if n == 0 {
            return Err(Error::Model(format!("tree {idx}: no nodes")));
        }
        if doc.split_type.iter().any(|&t| t != 0) {
            return Err(Error::Model(format!(
                "tree {idx}: categorical splits are not supported"
            )));
        }

        let mut nodes = Vec::with_capacity(n);
        for i in 0..n {
            let node = Node {
                left: doc.left_children[i],
                right: doc.right_children[i],
                feature: doc.split_indices[i],
                value: doc.split_conditions[i],
                default_left: doc.default_left[i].is_set(),
            };
            if !node.is_leaf() {
                let in_range = |child: i32| child > i as i32 && (child as usize) < n;
                if !in_range(node.left) || !in_range(node.right) {
                    return Err(Error::Model(format!(
                        "tree {idx}: node {i} has out-of-range children"
                    )));
                }
            }
            nodes.push(node);
        }

        Ok(Self { nodes })
    }

    /// Walk from the root to a leaf. Children always have larger ids than
    /// their parent, so the walk terminates.
    fn leaf_value(&self, features: &[f32]) -> f32 {
        let mut idx = 0usize;
        loop {
            let node = &self.nodes[idx];
            if node.is_leaf() {
                return node.value;
            }
            let x = features
                .get(node.feature as usize)
                .copied()
                .unwrap_or(f32::NAN);
            let go_left = if x.is_nan() {
                node.default_left
            } else {
                x < node.value
            };
            idx = if go_left { node.left } else { node.right } as usize;
        }
    }

    fn max_feature(&self) -> Option<u32> {
        self.nodes
            .iter()
            .filter(|n| !n.is_leaf())
            .map(|n| n.feature)
            .max()
    }
}

/// Boosted tree ensemble for single-target regression
#[derive(Debug, Clone)]
pub struct TreeEnsemble {
    trees: Vec<Tree>,
    base_margin: f32,
    link: Link,
    feature_names: Vec<String>,
    num_feature: usize,
}

impl TreeEnsemble {
    /// Parse an XGBoost JSON model document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let doc: ModelDocument = serde_json::from_str(json)?;
        let learner = doc.learner;

        if learner.gradient_booster.name != "gbtree" {
            return Err(Error::Model(format!(
                "unsupported booster '{}'",
                learner.gradient_booster.name
            )));
        }
        let model = learner
            .gradient_booster
            .model
            .ok_or_else(|| Error::Model("gbtree section has no model".to_string()))?;

        let link = Link::for_objective(&learner.objective.name)?;
        let base_score = parse_base_score(&learner.learner_model_param.base_score)?;

        let mut tree_docs = model.trees;
        if let Some(best) = learner.attributes.best_iteration.as_deref() {
            let best: usize = best
                .trim()
                .parse()
                .map_err(|_| Error::Model(format!("invalid best_iteration '{best}'")))?;
            let per_round = model
                .gbtree_model_param
                .as_ref()
                .and_then(|p| p.num_parallel_tree.trim().parse::<usize>().ok())
                .unwrap_or(1)
                .max(1);
            tree_docs.truncate((best + 1) * per_round);
        }

        let trees = tree_docs
            .into_iter()
            .enumerate()
            .map(|(idx, tree)| Tree::from_document(idx, tree))
            .collect::<Result<Vec<_>>>()?;

        let declared = learner
            .learner_model_param
            .num_feature
            .as_deref()
            .and_then(|n| n.trim().parse::<usize>().ok())
            .unwrap_or(0);
        let used = trees
            .iter()
            .filter_map(Tree::max_feature)
            .max()
            .map_or(0, |f| f as usize + 1);
        let num_feature = declared.max(used).max(learner.feature_names.len());

        Ok(Self {
            trees,
            base_margin: link.to_margin(base_score),
            link,
            feature_names: learner.feature_names,
            num_feature,
        })
    }

    /// Load a model saved with `Booster.save_model("model.json")`
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Number of boosted trees
    #[must_use]
    pub fn num_trees(&self) -> usize {
        self.trees.len()
    }

    /// Number of input columns the model expects
    #[must_use]
    pub fn num_feature(&self) -> usize {
        self.num_feature
    }

    /// Output transform in use
    #[must_use]
    pub fn link(&self) -> Link {
        self.link
    }

    /// Convert a row into the dense input vector, validating its shape
    fn dense_input(&self, row: &NormalizedRow) -> Result<Vec<f32>> {
        if !self.feature_names.is_empty() && !row.names().eq(self.feature_names.iter().map(String::as_str)) {
            return Err(Error::Model(format!(
                "feature_names mismatch: expected {:?}, got {:?}",
                self.feature_names,
                row.names().collect::<Vec<_>>()
            )));
        }
        if row.len() != self.num_feature {
            return Err(Error::Model(format!(
                "feature shape mismatch: expected {}, got {}",
                self.num_feature,
                row.len()
            )));
        }

        row.iter()
            .map(|(name, cell)| match cell {
                Cell::Text(text) => Err(Error::Model(format!(
                    "column '{name}' holds non-numeric value {text:?}"
                ))),
                numeric => Ok(numeric.as_f64().unwrap_or(f64::NAN) as f32),
            })
            .collect()
    }

    /// Predict on an already dense input vector
    #[must_use]
    pub fn predict_dense(&self, features: &[f32]) -> f32 {
        let margin = self
            .trees
            .iter()
            .fold(self.base_margin, |acc, tree| acc + tree.leaf_value(features));
        self.link.apply(margin)
    }
}

impl Regressor for TreeEnsemble {
    fn predict(&self, row: &NormalizedRow) -> Result<Vec<f64>> {
        let input = self.dense_input(row)?;
        Ok(vec![f64::from(self.predict_dense(&input))])
    }

    fn feature_names(&self) -> Option<&[String]> {
        if self.feature_names.is_empty() {
            None
        } else {
            Some(&self.feature_names)
        }
    }
}

/// Parse `base_score`, which newer writers wrap in brackets
fn parse_base_score(raw: &str) -> Result<f32> {
    let trimmed = raw.trim().trim_start_matches('[').trim_end_matches(']');
    let mut parts = trimmed.split(',');
    let first = parts.next().unwrap_or_default().trim();
    if parts.next().is_some() {
        return Err(Error::Model(
            "multi-target base_score is not supported".to_string(),
        ));
    }
    first
        .parse::<f32>()
        .map_err(|_| Error::Model(format!("invalid base_score '{raw}'")))
}
