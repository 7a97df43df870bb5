//! Error taxonomy of the scoring pipeline.
//!
//! Only [`ValidationError`] is attributable to the caller's input. The other
//! three signal a broken deployment (bad artifact, mismatched artifacts) or a
//! bug between the encoder and the model, and must stop the process from
//! serving traffic.

use std::fmt;
use std::path::PathBuf;

/// Why a single field of a client record was rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldProblem {
    /// Required attribute absent and the encoder table declares no default.
    Missing,
    /// NaN or infinite value.
    NotFinite,
    BelowMinimum { value: f64, min: f64 },
    AboveMaximum { value: f64, max: f64 },
    UnknownCategory { value: String, allowed: Vec<String> },
    /// The record could not be decoded at all (wrong JSON type, bad syntax).
    Malformed(String),
}

impl fmt::Display for FieldProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldProblem::Missing => write!(f, "required value is missing"),
            FieldProblem::NotFinite => write!(f, "value must be a finite number"),
            FieldProblem::BelowMinimum { value, min } => {
                write!(f, "must be >= {} (got {})", min, value)
            }
            FieldProblem::AboveMaximum { value, max } => {
                write!(f, "must be <= {} (got {})", max, value)
            }
            FieldProblem::UnknownCategory { value, allowed } => write!(
                f,
                "unknown category '{}' (expected one of: {})",
                value,
                allowed.join(", ")
            ),
            FieldProblem::Malformed(detail) => write!(f, "{}", detail),
        }
    }
}

/// One rejected field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldIssue {
    pub field: String,
    pub problem: FieldProblem,
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.problem)
    }
}

/// A client record was rejected. Lists every failing field, not just the first.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid client record: {}", join_issues(.issues))]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

fn join_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    pub fn single(field: impl Into<String>, problem: FieldProblem) -> Self {
        Self {
            issues: vec![FieldIssue {
                field: field.into(),
                problem,
            }],
        }
    }

    /// Names of the rejected fields, in the order they were checked.
    pub fn fields(&self) -> Vec<&str> {
        self.issues.iter().map(|i| i.field.as_str()).collect()
    }
}

/// An artifact could not be opened, parsed or accepted at startup.
#[derive(Debug, thiserror::Error)]
pub enum ModelLoadError {
    #[error("failed to read artifact at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("artifact at {path} is not valid JSON for its kind: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported artifact format version {found} (supported: {supported})")]
    UnsupportedFormat { found: u32, supported: u32 },

    #[error("encoder table has {encoder} features but the model expects {model}")]
    FeatureCountMismatch { encoder: usize, model: usize },

    #[error("artifact is inconsistent: {}", .problems.join("; "))]
    Invalid { problems: Vec<String> },

    #[error("failed to write artifact at {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A feature vector does not have the length the model was trained on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("feature vector has {actual} values but the model expects {expected}")]
pub struct ShapeError {
    pub expected: usize,
    pub actual: usize,
}

/// Two artifacts (or an artifact and a vector) come from different model versions.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{component} is bound to model version '{found}' but '{expected}' is loaded{}", detail_suffix(.detail))]
pub struct VersionMismatchError {
    pub component: &'static str,
    pub expected: String,
    pub found: String,
    pub detail: Option<String>,
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail
        .as_ref()
        .map(|d| format!(" ({})", d))
        .unwrap_or_default()
}

/// Any failure the pipeline can report.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    ModelLoad(#[from] ModelLoadError),

    #[error(transparent)]
    Shape(#[from] ShapeError),

    #[error(transparent)]
    VersionMismatch(#[from] VersionMismatchError),
}

impl Error {
    /// Stable machine-readable code for transports and logs.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_FAILED",
            Self::ModelLoad(_) => "MODEL_LOAD_FAILED",
            Self::Shape(_) => "SHAPE_MISMATCH",
            Self::VersionMismatch(_) => "VERSION_MISMATCH",
        }
    }

    /// True only when the caller's input caused the failure (4xx-equivalent).
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
