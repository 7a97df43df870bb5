use tracing::info;

use super::schema::{EncoderTable, Encoding, FeatureSpec};
use super::validation::validate_table;
use super::vector::FeatureVector;
use crate::error::{FieldIssue, FieldProblem, ModelLoadError, ValidationError};
use crate::record::{ClientRecord, RawValue};

/// Turns client records into feature vectors for one model version.
#[derive(Debug, Clone)]
pub struct Encoder {
    model_version: String,
    table: EncoderTable,
}

impl Encoder {
    /// Build an encoder from a table loaded out of a model artifact.
    pub fn new(model_version: impl Into<String>, table: EncoderTable) -> Result<Self, ModelLoadError> {
        validate_table(&table).map_err(|problems| ModelLoadError::Invalid { problems })?;
        let model_version = model_version.into();
        info!(
            model_version = %model_version,
            features = table.len(),
            "Encoder table loaded"
        );
        Ok(Self {
            model_version,
            table,
        })
    }

    pub fn model_version(&self) -> &str {
        &self.model_version
    }

    pub fn table(&self) -> &EncoderTable {
        &self.table
    }

    pub fn feature_count(&self) -> usize {
        self.table.len()
    }

    pub fn feature_names(&self) -> Vec<String> {
        self.table.feature_names()
    }

    /// Encode a record.
    ///
    /// Every feature is checked before failing, so the error lists all bad
    /// fields at once.
    pub fn encode(&self, record: &ClientRecord) -> Result<FeatureVector, ValidationError> {
        let mut values = Vec::with_capacity(self.table.len());
        let mut issues = Vec::new();

        for spec in &self.table.features {
            match encode_feature(spec, record) {
                Ok(v) => values.push(v),
                Err(problem) => issues.push(FieldIssue {
                    field: spec.name().to_string(),
                    problem,
                }),
            }
        }

        if issues.is_empty() {
            Ok(FeatureVector::new(self.model_version.clone(), values))
        } else {
            Err(ValidationError { issues })
        }
    }
}

fn encode_feature(spec: &FeatureSpec, record: &ClientRecord) -> Result<f64, FieldProblem> {
    let raw = record.value(spec.attribute);

    match &spec.encoding {
        Encoding::Numeric {
            default,
            min,
            max,
            scaling,
        } => {
            let value = match raw {
                Some(RawValue::Numeric(v)) => v,
                Some(RawValue::Categorical(label)) => {
                    return Err(FieldProblem::Malformed(format!(
                        "expected a number, got '{}'",
                        label
                    )));
                }
                None => default.ok_or(FieldProblem::Missing)?,
            };
            if !value.is_finite() {
                return Err(FieldProblem::NotFinite);
            }
            if let Some(lo) = *min {
                if value < lo {
                    return Err(FieldProblem::BelowMinimum { value, min: lo });
                }
            }
            if let Some(hi) = *max {
                if value > hi {
                    return Err(FieldProblem::AboveMaximum { value, max: hi });
                }
            }
            Ok(scaling.apply(value))
        }
        Encoding::Categorical {
            categories,
            default,
        } => {
            let label = match raw {
                Some(RawValue::Categorical(label)) => label.trim(),
                Some(RawValue::Numeric(v)) => {
                    return Err(FieldProblem::Malformed(format!(
                        "expected a category label, got {}",
                        v
                    )));
                }
                None => default.as_deref().ok_or(FieldProblem::Missing)?,
            };
            categories
                .iter()
                .position(|c| c == label)
                .map(|index| index as f64)
                .ok_or_else(|| FieldProblem::UnknownCategory {
                    value: label.to_string(),
                    allowed: categories.clone(),
                })
        }
    }
}
