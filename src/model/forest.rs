use serde::{Deserialize, Serialize};

use super::tree::Tree;

/// An averaged ensemble of probability trees (random-forest style).
///
/// The output is the plain mean of the leaves reached, so it is already a
/// probability and needs no link function. That keeps the attributions
/// additive in probability space.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Forest {
    pub trees: Vec<Tree>,
}

impl Forest {
    pub fn predict(&self, x: &[f64]) -> f64 {
        // Summed in tree order so results are bit-identical across runs.
        let total: f64 = self.trees.iter().map(|t| t.predict(x)).sum();
        total / self.trees.len() as f64
    }

    pub fn expected_value(&self) -> f64 {
        let total: f64 = self.trees.iter().map(Tree::expected_value).sum();
        total / self.trees.len() as f64
    }

    pub fn node_count(&self) -> usize {
        self.trees.iter().map(|t| t.nodes.len()).sum()
    }

    pub fn max_depth(&self) -> usize {
        self.trees.iter().map(Tree::depth).max().unwrap_or(0)
    }
}
