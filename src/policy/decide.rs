use serde::Serialize;
use std::fmt;

use super::config::PolicyConfig;
use super::validation::validate_policy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Eligible,
    NotEligible,
}

/// How far the probability sits from the decision threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfidenceBand {
    Low,
    Medium,
    High,
}

impl Verdict {
    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Eligible => "ELIGIBLE",
            Verdict::NotEligible => "NOT_ELIGIBLE",
        }
    }
}

impl ConfidenceBand {
    pub fn as_str(self) -> &'static str {
        match self {
            ConfidenceBand::Low => "LOW",
            ConfidenceBand::Medium => "MEDIUM",
            ConfidenceBand::High => "HIGH",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ConfidenceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of the policy for one probability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Decision {
    pub probability: f64,
    pub verdict: Verdict,
    pub confidence_band: ConfidenceBand,
}

/// Threshold plus confidence margins. Pure; holds no state between calls.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DecisionPolicy {
    config: PolicyConfig,
}

impl DecisionPolicy {
    pub fn new(config: PolicyConfig) -> Result<Self, Vec<String>> {
        validate_policy(&config)?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    pub fn threshold(&self) -> f64 {
        self.config.threshold
    }

    /// Map a probability to a verdict and confidence band.
    ///
    /// 0.0 and 1.0 are ordinary inputs. A NaN (which the model never
    /// produces) yields NOT_ELIGIBLE with LOW confidence.
    pub fn decide(&self, probability: f64) -> Decision {
        if probability.is_nan() {
            return Decision {
                probability,
                verdict: Verdict::NotEligible,
                confidence_band: ConfidenceBand::Low,
            };
        }

        let PolicyConfig {
            threshold,
            low_confidence_margin,
            high_confidence_margin,
        } = self.config;

        let verdict = if probability >= threshold {
            Verdict::Eligible
        } else {
            Verdict::NotEligible
        };

        let distance = (probability - threshold).abs();
        let confidence_band = if distance < low_confidence_margin {
            ConfidenceBand::Low
        } else if distance < high_confidence_margin {
            ConfidenceBand::Medium
        } else {
            ConfidenceBand::High
        };

        Decision {
            probability,
            verdict,
            confidence_band,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_is_eligible_with_high_confidence() {
        let decision = DecisionPolicy::default().decide(0.732);
        assert_eq!(decision.verdict, Verdict::Eligible);
        assert_eq!(decision.confidence_band, ConfidenceBand::High);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let policy = DecisionPolicy::default();
        assert_eq!(policy.decide(0.5).verdict, Verdict::Eligible);
        assert_eq!(policy.decide(0.5).confidence_band, ConfidenceBand::Low);
        assert_eq!(policy.decide(0.4999999).verdict, Verdict::NotEligible);
    }

    #[test]
    fn test_boundary_monotonicity() {
        let policy = DecisionPolicy::default();
        let below = [0.0, 0.1, 0.3, 0.45, 0.499, 0.4999999999];
        let above = [0.5, 0.5000000001, 0.55, 0.7, 0.99, 1.0];
        for p1 in below {
            for p2 in above {
                assert_eq!(policy.decide(p1).verdict, Verdict::NotEligible);
                assert_eq!(policy.decide(p2).verdict, Verdict::Eligible);
            }
        }
    }

    #[test]
    fn test_confidence_bands() {
        let policy = DecisionPolicy::default();
        // |p - 0.5| < 0.05 -> LOW, whatever the verdict
        assert_eq!(policy.decide(0.46).confidence_band, ConfidenceBand::Low);
        assert_eq!(policy.decide(0.54).confidence_band, ConfidenceBand::Low);
        // 0.05 <= |p - 0.5| < 0.2 -> MEDIUM
        assert_eq!(policy.decide(0.40).confidence_band, ConfidenceBand::Medium);
        assert_eq!(policy.decide(0.65).confidence_band, ConfidenceBand::Medium);
        // |p - 0.5| >= 0.2 -> HIGH
        assert_eq!(policy.decide(0.25).confidence_band, ConfidenceBand::High);
        assert_eq!(policy.decide(0.75).confidence_band, ConfidenceBand::High);
    }

    #[test]
    fn test_extreme_probabilities() {
        let policy = DecisionPolicy::default();
        let zero = policy.decide(0.0);
        assert_eq!(zero.verdict, Verdict::NotEligible);
        assert_eq!(zero.confidence_band, ConfidenceBand::High);
        let one = policy.decide(1.0);
        assert_eq!(one.verdict, Verdict::Eligible);
        assert_eq!(one.confidence_band, ConfidenceBand::High);
    }

    #[test]
    fn test_nan_is_least_confident_rejection() {
        let decision = DecisionPolicy::default().decide(f64::NAN);
        assert_eq!(decision.verdict, Verdict::NotEligible);
        assert_eq!(decision.confidence_band, ConfidenceBand::Low);
    }

    #[test]
    fn test_custom_threshold() {
        let policy = DecisionPolicy::new(PolicyConfig {
            threshold: 0.7,
            low_confidence_margin: 0.02,
            high_confidence_margin: 0.1,
        })
        .unwrap();
        let decision = policy.decide(0.732);
        assert_eq!(decision.verdict, Verdict::Eligible);
        assert_eq!(decision.confidence_band, ConfidenceBand::Medium);
    }

    #[test]
    fn test_invalid_policy_rejected() {
        let result = DecisionPolicy::new(PolicyConfig {
            threshold: 2.0,
            ..Default::default()
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_serialized_names() {
        assert_eq!(serde_json::to_string(&Verdict::NotEligible).unwrap(), "\"NOT_ELIGIBLE\"");
        assert_eq!(serde_json::to_string(&ConfidenceBand::High).unwrap(), "\"HIGH\"");
    }
}
