use serde::{Deserialize, Serialize};

pub const DEFAULT_THRESHOLD: f64 = 0.5;
pub const DEFAULT_LOW_CONFIDENCE_MARGIN: f64 = 0.05;
pub const DEFAULT_HIGH_CONFIDENCE_MARGIN: f64 = 0.20;

/// Decision policy configuration.
///
/// Probabilities at or above `threshold` are eligible. The distance to the
/// threshold sets the confidence band: below `low_confidence_margin` is LOW,
/// below `high_confidence_margin` is MEDIUM, anything further is HIGH.
///
/// Example YAML:
/// ```yaml
/// policy:
///   threshold: 0.5
///   low_confidence_margin: 0.05
///   high_confidence_margin: 0.2
/// ```
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PolicyConfig {
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    #[serde(default = "default_low_margin")]
    pub low_confidence_margin: f64,

    #[serde(default = "default_high_margin")]
    pub high_confidence_margin: f64,
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

fn default_low_margin() -> f64 {
    DEFAULT_LOW_CONFIDENCE_MARGIN
}

fn default_high_margin() -> f64 {
    DEFAULT_HIGH_CONFIDENCE_MARGIN
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            low_confidence_margin: DEFAULT_LOW_CONFIDENCE_MARGIN,
            high_confidence_margin: DEFAULT_HIGH_CONFIDENCE_MARGIN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_config() {
        let config = PolicyConfig::default();
        assert_eq!(config.threshold, 0.5);
        assert_eq!(config.low_confidence_margin, 0.05);
        assert_eq!(config.high_confidence_margin, 0.2);
    }

    #[test]
    fn test_policy_config_serde_roundtrip() {
        let config = PolicyConfig::default();
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: PolicyConfig = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_policy_config_parse() {
        let yaml = "threshold: 0.6\n";
        let config: PolicyConfig = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.threshold, 0.6);
        assert_eq!(config.low_confidence_margin, DEFAULT_LOW_CONFIDENCE_MARGIN);
        assert_eq!(config.high_confidence_margin, DEFAULT_HIGH_CONFIDENCE_MARGIN);
    }

    #[test]
    fn test_empty_policy_config_parse() {
        let config: PolicyConfig = serde_saphyr::from_str("{}").unwrap();
        assert_eq!(config, PolicyConfig::default());
    }
}
