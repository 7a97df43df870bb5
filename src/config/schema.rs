use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::pipeline::ArtifactPaths;
use crate::policy::PolicyConfig;

/// Application configuration (YAML).
///
/// Example:
/// ```yaml
/// artifacts:
///   model: model.json
///   explainer: explainer.json
/// policy:
///   threshold: 0.5
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub artifacts: ArtifactsConfig,
    #[serde(default)]
    pub policy: PolicyConfig,
}

/// Artifact locations. Relative paths are resolved against the directory
/// holding the config file.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ArtifactsConfig {
    pub model: PathBuf,
    pub explainer: PathBuf,
}

impl Config {
    pub fn artifact_paths(&self, base_dir: &Path) -> ArtifactPaths {
        ArtifactPaths {
            model: base_dir.join(&self.artifacts.model),
            explainer: base_dir.join(&self.artifacts.explainer),
        }
    }
}
