//! Adapter around the pretrained heart-attack classifier artifact.
//!
//! The artifact is a decision tree exported to JSON by the training
//! pipeline (out of scope here). It is loaded exactly once at process
//! start, never mutated afterwards, and is therefore safe to share
//! read-only across all request handlers.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::models::patient::PatientRecord;
use crate::ServiceError;

/// Column contract expected by the artifact: 15 features, fixed order.
/// `obesity` is carried by [`PatientRecord`] but not consumed by the
/// classifier.
pub const FEATURES: [&str; 15] = [
    "age",
    "cholesterol",
    "heart rate",
    "diabetes",
    "smoking",
    "alcohol consumption",
    "exercise hours per week",
    "stress level",
    "sedentary hours per day",
    "bmi",
    "physical activity days per week",
    "sleep hours per day",
    "troponin",
    "gender",
    "systolic blood pressure",
];

/// The three input shapes accepted by [`RiskModel::predict`]: a typed
/// record, a positionally-ordered vector matching [`FEATURES`], or a
/// mapping keyed by feature name.
#[derive(Debug)]
pub enum ModelInput<'a> {
    Record(&'a PatientRecord),
    Ordered(Vec<f64>),
    Named(HashMap<String, f64>),
}

impl ModelInput<'_> {
    /// Normalize into a single row with columns exactly [`FEATURES`], in
    /// order. Extra keys are dropped; a missing feature or a wrong-length
    /// vector is a feature-contract fault.
    fn into_row(self) -> Result<Vec<f64>, ServiceError> {
        let missing =
            |name: &str| ServiceError::FeatureMismatch(format!("missing feature `{name}`"));
        match self {
            ModelInput::Record(record) => {
                let map = record.to_feature_map();
                FEATURES
                    .iter()
                    .map(|name| map.get(name).copied().ok_or_else(|| missing(name)))
                    .collect()
            }
            ModelInput::Named(map) => FEATURES
                .iter()
                .map(|name| map.get(*name).copied().ok_or_else(|| missing(name)))
                .collect(),
            ModelInput::Ordered(values) => {
                if values.len() != FEATURES.len() {
                    return Err(ServiceError::FeatureMismatch(format!(
                        "expected {} ordered values, got {}",
                        FEATURES.len(),
                        values.len()
                    )));
                }
                Ok(values)
            }
        }
    }
}

/// Serialized artifact layout.
#[derive(Debug, Deserialize)]
struct Artifact {
    #[allow(dead_code)]
    model: String,
    features: Vec<String>,
    tree: TreeNode,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
    Leaf {
        value: f64,
    },
}

impl TreeNode {
    fn eval(&self, row: &[f64]) -> f64 {
        match self {
            TreeNode::Leaf { value } => *value,
            TreeNode::Split { feature, threshold, left, right } => {
                if row[*feature] <= *threshold {
                    left.eval(row)
                } else {
                    right.eval(row)
                }
            }
        }
    }

    /// Every split must reference a valid feature column.
    fn check_indices(&self) -> Result<(), String> {
        match self {
            TreeNode::Leaf { .. } => Ok(()),
            TreeNode::Split { feature, left, right, .. } => {
                if *feature >= FEATURES.len() {
                    return Err(format!("split references feature index {feature} out of range"));
                }
                left.check_indices()?;
                right.check_indices()
            }
        }
    }
}

/// The loaded classifier. Stateless and side-effect-free per call.
#[derive(Debug)]
pub struct RiskModel {
    tree: TreeNode,
}

impl RiskModel {
    /// Default artifact location, colocated with the service.
    pub const DEFAULT_PATH: &'static str = "model/decision_tree.json";

    /// Load the artifact from disk. Called once at startup; any failure
    /// here is fatal to the process, not recoverable per-request.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ServiceError> {
        let path = path.as_ref();
        let artifact_load = |reason: String| ServiceError::ArtifactLoad {
            path: PathBuf::from(path),
            reason,
        };
        let text = fs::read_to_string(path).map_err(|e| artifact_load(e.to_string()))?;
        Self::from_json(&text).map_err(artifact_load)
    }

    fn from_json(text: &str) -> Result<Self, String> {
        let artifact: Artifact = serde_json::from_str(text).map_err(|e| e.to_string())?;
        if artifact.features.len() != FEATURES.len()
            || artifact.features.iter().zip(FEATURES).any(|(have, want)| have.as_str() != want)
        {
            return Err("artifact feature list does not match the expected contract".to_string());
        }
        artifact.tree.check_indices()?;
        Ok(RiskModel { tree: artifact.tree })
    }

    /// Run the classifier on one input and coerce the raw prediction to a
    /// boolean risk flag: non-zero means high risk.
    pub fn predict(&self, input: ModelInput<'_>) -> Result<bool, ServiceError> {
        let row = input.into_row()?;
        Ok(self.tree.eval(&row) != 0.0)
    }
}
