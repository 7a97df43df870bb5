//! Loan eligibility scoring with per-feature explanations.
//!
//! A [`Scorer`] encodes a [`ClientRecord`], asks the forest model for the
//! probability of eligibility, attributes that probability to the input
//! features, and applies the decision policy. The returned [`ScoreReport`]
//! satisfies `baseline + Σ contributions == probability`.

pub mod config;
pub mod encoder;
pub mod error;
pub mod explain;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod policy;
pub mod record;

#[cfg(test)]
mod test_support;

pub use error::{Error, ModelLoadError, ShapeError, ValidationError, VersionMismatchError};
pub use explain::{AttributionEngine, ExplainerArtifact, Explanation};
pub use model::{ModelArtifact, ScoringModel};
pub use pipeline::{ArtifactPaths, ScoreReport, Scorer};
pub use policy::{DecisionPolicy, PolicyConfig};
pub use record::ClientRecord;
