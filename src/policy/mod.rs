//! Decision policy: probability in, verdict and confidence band out.

pub mod config;
pub mod decide;
pub mod validation;

pub use config::PolicyConfig;
pub use decide::{ConfidenceBand, Decision, DecisionPolicy, Verdict};
pub use validation::validate_policy;
