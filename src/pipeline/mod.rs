//! The assembled scoring pipeline: record → vector → probability and
//! attributions → decision.

pub mod report;
pub mod scorer;

pub use report::ScoreReport;
pub use scorer::{ArtifactPaths, Scorer};
