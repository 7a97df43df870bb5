use serde::Serialize;

use crate::explain::{Attribution, AttributionVector, Explanation};
use crate::policy::{ConfidenceBand, Decision, Verdict};

/// Everything the transport needs to answer one scoring request.
///
/// Serializes as:
/// ```json
/// {
///   "probability": 0.732,
///   "verdict": "ELIGIBLE",
///   "confidence_band": "HIGH",
///   "attributions": [{"feature": "income", "contribution": 0.11}],
///   "baseline": 0.496,
///   "model_version": "2024.06-rf"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreReport {
    pub probability: f64,
    pub verdict: Verdict,
    pub confidence_band: ConfidenceBand,
    pub attributions: Vec<Attribution>,
    pub baseline: f64,
    pub model_version: String,
}

impl ScoreReport {
    pub fn new(decision: Decision, attributions: AttributionVector, model_version: &str) -> Self {
        Self {
            probability: decision.probability,
            verdict: decision.verdict,
            confidence_band: decision.confidence_band,
            attributions: attributions.attributions,
            baseline: attributions.baseline,
            model_version: model_version.to_string(),
        }
    }

    pub fn decision(&self) -> Decision {
        Decision {
            probability: self.probability,
            verdict: self.verdict,
            confidence_band: self.confidence_band,
        }
    }

    pub fn attribution_vector(&self) -> AttributionVector {
        AttributionVector {
            baseline: self.baseline,
            attributions: self.attributions.clone(),
        }
    }

    /// Features ranked by how strongly they moved the probability.
    pub fn explanations(&self) -> Vec<Explanation> {
        self.attribution_vector().ranked()
    }

    /// `|baseline + Σ contributions - probability|`
    pub fn additivity_gap(&self) -> f64 {
        let total: f64 = self.attributions.iter().map(|a| a.contribution).sum();
        (self.baseline + total - self.probability).abs()
    }

    pub fn is_eligible(&self) -> bool {
        self.verdict == Verdict::Eligible
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> ScoreReport {
        ScoreReport::new(
            Decision {
                probability: 0.7,
                verdict: Verdict::Eligible,
                confidence_band: ConfidenceBand::High,
            },
            AttributionVector {
                baseline: 0.5,
                attributions: vec![
                    Attribution {
                        feature: "income".to_string(),
                        contribution: 0.25,
                    },
                    Attribution {
                        feature: "debt".to_string(),
                        contribution: -0.05,
                    },
                ],
            },
            "v1",
        )
    }

    #[test]
    fn test_report_json_shape() {
        let json = serde_json::to_value(report()).unwrap();
        assert_eq!(json["verdict"], "ELIGIBLE");
        assert_eq!(json["confidence_band"], "HIGH");
        assert_eq!(json["attributions"][0]["feature"], "income");
        assert_eq!(json["attributions"][1]["contribution"], -0.05);
        assert_eq!(json["baseline"], 0.5);
        assert_eq!(json["model_version"], "v1");
    }

    #[test]
    fn test_additivity_gap() {
        assert!(report().additivity_gap() < 1e-12);
    }

    #[test]
    fn test_explanations_strongest_first() {
        let explanations = report().explanations();
        assert_eq!(explanations[0].feature, "income");
        assert_eq!(explanations[1].feature, "debt");
    }
}
