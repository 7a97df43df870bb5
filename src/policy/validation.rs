use super::config::PolicyConfig;

/// Validate the policy configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_policy(config: &PolicyConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    let PolicyConfig {
        threshold,
        low_confidence_margin: low,
        high_confidence_margin: high,
    } = *config;

    if !(0.0..=1.0).contains(&threshold) {
        errors.push(format!("policy.threshold: must be within [0, 1] (got {})", threshold));
    }
    if !(low.is_finite() && low >= 0.0) {
        errors.push(format!(
            "policy.low_confidence_margin: must be a non-negative number (got {})",
            low
        ));
    }
    if !(high.is_finite() && high >= 0.0) {
        errors.push(format!(
            "policy.high_confidence_margin: must be a non-negative number (got {})",
            high
        ));
    } else if low.is_finite() && high < low {
        errors.push(format!(
            "policy.high_confidence_margin: must be >= low_confidence_margin ({} < {})",
            high, low
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
