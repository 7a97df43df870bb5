//! Additive per-feature attribution of the model's probability.

pub mod artifact;
pub mod engine;
pub mod explanation;
mod tree_shap;

pub use artifact::{AttributionMethod, ExplainerArtifact, EXPLAINER_FORMAT_VERSION};
pub use engine::{Attribution, AttributionEngine, AttributionVector};
pub use explanation::{Direction, Explanation};
