//! The scoring model: an averaged forest of probability trees, and the
//! artifact it is loaded from.

pub mod artifact;
pub mod forest;
pub mod scoring;
pub mod tree;
pub mod validation;

pub use artifact::{ModelArtifact, MODEL_FORMAT_VERSION};
pub use forest::Forest;
pub use scoring::ScoringModel;
pub use tree::{Node, Tree};
pub use validation::{validate_forest, MAX_TREE_DEPTH};
