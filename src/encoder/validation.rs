use std::collections::HashSet;

use super::schema::{EncoderTable, Encoding, Scaling};
use crate::record::AttributeKind;

/// Validate an encoder table when its artifact is loaded.
/// Returns all problems at once (not just the first).
pub fn validate_table(table: &EncoderTable) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if table.is_empty() {
        errors.push("features: at least one feature is required".to_string());
    }

    let mut seen = HashSet::new();
    for (i, spec) in table.features.iter().enumerate() {
        let at = format!("features[{}]", i);

        if !seen.insert(spec.attribute) {
            errors.push(format!(
                "{}.attribute: '{}' is encoded more than once",
                at, spec.attribute
            ));
        }

        match &spec.encoding {
            Encoding::Numeric {
                default,
                min,
                max,
                scaling,
            } => {
                if spec.attribute.kind() != AttributeKind::Numeric {
                    errors.push(format!(
                        "{}.encoding: '{}' is categorical but the encoding is numeric",
                        at, spec.attribute
                    ));
                }
                for (name, value) in [("default", default), ("min", min), ("max", max)] {
                    if let Some(v) = value {
                        if !v.is_finite() {
                            errors.push(format!("{}.encoding.{}: must be finite", at, name));
                        }
                    }
                }
                if let (Some(lo), Some(hi)) = (min, max) {
                    if lo > hi {
                        errors.push(format!(
                            "{}.encoding: min ({}) is greater than max ({})",
                            at, lo, hi
                        ));
                    }
                }
                if let Some(d) = default {
                    if min.is_some_and(|lo| *d < lo) || max.is_some_and(|hi| *d > hi) {
                        errors.push(format!(
                            "{}.encoding.default: {} is outside the declared domain",
                            at, d
                        ));
                    }
                }
                match scaling {
                    Scaling::Identity => {}
                    Scaling::Standard { center, scale } => {
                        if !center.is_finite() {
                            errors.push(format!("{}.encoding.scaling.center: must be finite", at));
                        }
                        if !(scale.is_finite() && *scale > 0.0) {
                            errors.push(format!(
                                "{}.encoding.scaling.scale: must be a positive number",
                                at
                            ));
                        }
                    }
                    Scaling::Log1p => {
                        if !min.is_some_and(|lo| lo >= 0.0) {
                            errors.push(format!(
                                "{}.encoding.scaling: log1p requires min >= 0",
                                at
                            ));
                        }
                    }
                }
            }
            Encoding::Categorical {
                categories,
                default,
            } => {
                if spec.attribute.kind() != AttributeKind::Categorical {
                    errors.push(format!(
                        "{}.encoding: '{}' is numeric but the encoding is categorical",
                        at, spec.attribute
                    ));
                }
                if categories.is_empty() {
                    errors.push(format!("{}.encoding.categories: must not be empty", at));
                }
                let mut labels = HashSet::new();
                for label in categories {
                    if !labels.insert(label.as_str()) {
                        errors.push(format!(
                            "{}.encoding.categories: duplicate category '{}'",
                            at, label
                        ));
                    }
                }
                if let Some(d) = default {
                    if !categories.contains(d) {
                        errors.push(format!(
                            "{}.encoding.default: '{}' is not a known category",
                            at, d
                        ));
                    }
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
