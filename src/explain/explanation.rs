use serde::Serialize;
use std::fmt;

use super::engine::AttributionVector;

/// Which way a feature moved the probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Raises,
    Lowers,
    Neutral,
}

/// One advisor-facing line: a feature and how strongly it moved the score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Explanation {
    pub feature: String,
    pub contribution: f64,
    pub direction: Direction,
}

impl fmt::Display for Explanation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction {
            Direction::Raises => write!(
                f,
                "'{}' raises the eligibility score by {:.3}",
                self.feature, self.contribution
            ),
            Direction::Lowers => write!(
                f,
                "'{}' lowers the eligibility score by {:.3}",
                self.feature,
                self.contribution.abs()
            ),
            Direction::Neutral => write!(f, "'{}' has no effect on the score", self.feature),
        }
    }
}

impl AttributionVector {
    /// Features ranked by absolute contribution, strongest first.
    ///
    /// Equal magnitudes keep feature-vector order.
    pub fn ranked(&self) -> Vec<Explanation> {
        let mut ranked: Vec<Explanation> = self
            .attributions
            .iter()
            .map(|a| Explanation {
                feature: a.feature.clone(),
                contribution: a.contribution,
                direction: if a.contribution > 0.0 {
                    Direction::Raises
                } else if a.contribution < 0.0 {
                    Direction::Lowers
                } else {
                    Direction::Neutral
                },
            })
            .collect();
        // Stable sort: ties stay in feature order.
        ranked.sort_by(|a, b| b.contribution.abs().total_cmp(&a.contribution.abs()));
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::explain::Attribution;

    fn vector(contributions: &[(&str, f64)]) -> AttributionVector {
        AttributionVector {
            baseline: 0.5,
            attributions: contributions
                .iter()
                .map(|(feature, contribution)| Attribution {
                    feature: feature.to_string(),
                    contribution: *contribution,
                })
                .collect(),
        }
    }

    #[test]
    fn test_ranked_by_magnitude() {
        let ranked = vector(&[("income", 0.05), ("debt", -0.2), ("age", 0.0), ("housing", 0.1)]).ranked();
        let order: Vec<&str> = ranked.iter().map(|e| e.feature.as_str()).collect();
        assert_eq!(order, vec!["debt", "housing", "income", "age"]);
        assert_eq!(ranked[0].direction, Direction::Lowers);
        assert_eq!(ranked[1].direction, Direction::Raises);
        assert_eq!(ranked[3].direction, Direction::Neutral);
    }

    #[test]
    fn test_ties_keep_feature_order() {
        let ranked = vector(&[("income", 0.1), ("debt", -0.1)]).ranked();
        assert_eq!(ranked[0].feature, "income");
        assert_eq!(ranked[1].feature, "debt");
    }

    #[test]
    fn test_display() {
        let ranked = vector(&[("debt", -0.2), ("income", 0.1234)]).ranked();
        assert_eq!(
            ranked[0].to_string(),
            "'debt' lowers the eligibility score by 0.200"
        );
        assert_eq!(
            ranked[1].to_string(),
            "'income' raises the eligibility score by 0.123"
        );
    }
}
