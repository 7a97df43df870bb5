use serde::{Deserialize, Serialize};

use crate::record::Attribute;

/// The encoder's transformation table, in feature-vector order.
///
/// Stored inside the model artifact so that the imputation defaults, category
/// mappings and scaling factors always come from the same training run as the
/// trees that consume them.
///
/// Example (JSON):
/// ```json
/// {
///   "features": [
///     { "attribute": "income",
///       "encoding": { "kind": "numeric", "min": 0, "scaling": { "type": "identity" } } },
///     { "attribute": "housing",
///       "encoding": { "kind": "categorical", "categories": ["owner", "tenant"], "default": "tenant" } }
///   ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EncoderTable {
    pub features: Vec<FeatureSpec>,
}

/// How one record attribute becomes one feature.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FeatureSpec {
    pub attribute: Attribute,
    pub encoding: Encoding,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Encoding {
    Numeric {
        /// Imputed when the record omits the attribute. `None` makes it required.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default: Option<f64>,
        /// Inclusive lower bound on the raw value.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        /// Inclusive upper bound on the raw value.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
        #[serde(default)]
        scaling: Scaling,
    },
    /// Encoded as the label's position in `categories`.
    Categorical {
        categories: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default: Option<String>,
    },
}

/// Scaling applied after domain checks.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Scaling {
    #[default]
    Identity,
    /// `(x - center) / scale`
    Standard { center: f64, scale: f64 },
    /// `ln(1 + x)`, only valid on non-negative domains.
    Log1p,
}

impl Scaling {
    pub fn apply(self, x: f64) -> f64 {
        match self {
            Scaling::Identity => x,
            Scaling::Standard { center, scale } => (x - center) / scale,
            Scaling::Log1p => x.ln_1p(),
        }
    }
}

impl FeatureSpec {
    /// Feature name as shown in attributions.
    pub fn name(&self) -> &'static str {
        self.attribute.name()
    }
}

impl EncoderTable {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn feature_names(&self) -> Vec<String> {
        self.features.iter().map(|f| f.name().to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaling_apply() {
        assert_eq!(Scaling::Identity.apply(4200.0), 4200.0);
        assert_eq!(
            Scaling::Standard {
                center: 100.0,
                scale: 50.0
            }
            .apply(200.0),
            2.0
        );
        assert_eq!(Scaling::Log1p.apply(0.0), 0.0);
    }

    #[test]
    fn test_parse_table() {
        let json = r#"{
            "features": [
                {"attribute": "income", "encoding": {"kind": "numeric", "min": 0}},
                {"attribute": "incident_count", "encoding": {"kind": "numeric", "default": 0, "scaling": {"type": "log1p"}}},
                {"attribute": "housing", "encoding": {"kind": "categorical", "categories": ["owner", "tenant"], "default": "tenant"}}
            ]
        }"#;
        let table: EncoderTable = serde_json::from_str(json).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(
            table.features[0].encoding,
            Encoding::Numeric {
                default: None,
                min: Some(0.0),
                max: None,
                scaling: Scaling::Identity,
            }
        );
        assert_eq!(
            table.feature_names(),
            vec!["income", "incident_count", "housing"]
        );
    }

    #[test]
    fn test_parse_table_rejects_unknown_attribute() {
        let json = r#"{"features": [{"attribute": "shoe_size", "encoding": {"kind": "numeric"}}]}"#;
        assert!(serde_json::from_str::<EncoderTable>(json).is_err());
    }
}
