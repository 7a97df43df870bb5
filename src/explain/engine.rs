use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

use super::artifact::{AttributionMethod, ExplainerArtifact, EXPLAINER_FORMAT_VERSION};
use super::tree_shap;
use crate::encoder::FeatureVector;
use crate::error::{Error, VersionMismatchError};
use crate::model::ScoringModel;

/// Largest difference tolerated between a stored baseline and the one
/// recomputed from the bound model.
const BASELINE_TOLERANCE: f64 = 1e-9;

/// Contribution of one feature to a prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribution {
    pub feature: String,
    pub contribution: f64,
}

/// Per-feature contributions in feature-vector order.
///
/// `baseline + Σ contribution` reproduces the model's probability.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributionVector {
    pub baseline: f64,
    pub attributions: Vec<Attribution>,
}

impl AttributionVector {
    pub fn total(&self) -> f64 {
        self.attributions.iter().map(|a| a.contribution).sum()
    }

    /// The output the attributions account for.
    pub fn reconstructed(&self) -> f64 {
        self.baseline + self.total()
    }

    pub fn len(&self) -> usize {
        self.attributions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributions.is_empty()
    }
}

/// Explains predictions of one specific model instance.
#[derive(Debug, Clone)]
pub struct AttributionEngine {
    model: Arc<ScoringModel>,
    baseline: f64,
}

impl AttributionEngine {
    /// Bind an engine directly to a model.
    pub fn new(model: Arc<ScoringModel>) -> Self {
        let baseline = model.expected_value();
        Self { model, baseline }
    }

    /// Bind a persisted attribution artifact to the loaded model.
    ///
    /// Refuses artifacts fitted against another model version, another
    /// feature order, or whose baseline does not match this model.
    pub fn from_artifact(
        model: Arc<ScoringModel>,
        artifact: &ExplainerArtifact,
    ) -> Result<Self, VersionMismatchError> {
        let mismatch = |detail: Option<String>| VersionMismatchError {
            component: "attribution engine",
            expected: model.version().to_string(),
            found: artifact.model_version.clone(),
            detail,
        };

        if artifact.model_version != model.version() {
            return Err(mismatch(None));
        }
        if artifact.feature_names.as_slice() != model.feature_names() {
            return Err(mismatch(Some(format!(
                "features [{}] do not match the model's [{}]",
                artifact.feature_names.join(", "),
                model.feature_names().join(", ")
            ))));
        }
        let baseline = model.expected_value();
        if (artifact.expected_value - baseline).abs() > BASELINE_TOLERANCE {
            return Err(mismatch(Some(format!(
                "stored baseline {} differs from the model's {}",
                artifact.expected_value, baseline
            ))));
        }

        info!(
            model_version = %model.version(),
            baseline,
            "Attribution engine bound"
        );
        Ok(Self { model, baseline })
    }

    /// Fit a fresh attribution artifact for `model`.
    pub fn fit(model: &ScoringModel) -> ExplainerArtifact {
        let expected_value = model.expected_value();
        info!(
            model_version = %model.version(),
            expected_value,
            "Attribution artifact fitted"
        );
        ExplainerArtifact {
            format_version: EXPLAINER_FORMAT_VERSION,
            model_version: model.version().to_string(),
            method: AttributionMethod::TreePathDependent,
            feature_names: model.feature_names().to_vec(),
            expected_value,
            created_at: Some(chrono::Utc::now()),
        }
    }

    pub fn baseline(&self) -> f64 {
        self.baseline
    }

    pub fn model(&self) -> &Arc<ScoringModel> {
        &self.model
    }

    /// Attribute the model's output for `vector` to its features.
    pub fn explain(&self, vector: &FeatureVector) -> Result<AttributionVector, Error> {
        self.model.check_vector(vector)?;

        let forest = self.model.forest();
        let mut phi = vec![0.0; vector.len()];
        for tree in &forest.trees {
            tree_shap::accumulate(tree, vector.values(), &mut phi);
        }
        let trees = forest.trees.len() as f64;

        let attributions: Vec<Attribution> = self
            .model
            .feature_names()
            .iter()
            .zip(phi)
            .map(|(name, total)| Attribution {
                feature: name.clone(),
                contribution: total / trees,
            })
            .collect();

        let result = AttributionVector {
            baseline: self.baseline,
            attributions,
        };
        debug!(
            baseline = result.baseline,
            reconstructed = result.reconstructed(),
            "Attributions computed"
        );
        Ok(result)
    }
}
