use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::error::ModelLoadError;
use crate::model::artifact::{read_json, write_json};

/// Current layout of the attribution artifact.
pub const EXPLAINER_FORMAT_VERSION: u32 = 1;

/// Attribution algorithm recorded in the artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributionMethod {
    /// Exact TreeSHAP with cover-weighted conditional expectations.
    TreePathDependent,
}

/// The fitted attribution engine, persisted next to the model it explains.
///
/// It pins the model version, feature order and baseline it was fitted
/// against; binding it to anything else is refused.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ExplainerArtifact {
    pub format_version: u32,
    pub model_version: String,
    pub method: AttributionMethod,
    pub feature_names: Vec<String>,
    /// Model output with no evidence; the baseline of every attribution.
    pub expected_value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl ExplainerArtifact {
    pub fn load(path: &Path) -> Result<Self, ModelLoadError> {
        let artifact: ExplainerArtifact = read_json(path)?;
        if artifact.format_version != EXPLAINER_FORMAT_VERSION {
            return Err(ModelLoadError::UnsupportedFormat {
                found: artifact.format_version,
                supported: EXPLAINER_FORMAT_VERSION,
            });
        }
        info!(
            path = %path.display(),
            model_version = %artifact.model_version,
            "Explainer artifact read"
        );
        Ok(artifact)
    }

    pub fn save(&self, path: &Path) -> Result<(), ModelLoadError> {
        write_json(path, self)
    }
}
