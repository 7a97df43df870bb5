use serde::{Deserialize, Serialize};

/// One node of a binary decision tree.
///
/// `cover` is the training weight that reached the node. The attribution
/// engine uses it to average over the branches a feature does not decide.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    /// `x[feature] <= threshold` goes `left`, everything else goes `right`.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
        cover: f64,
    },
    /// Positive-class probability of the training samples in this leaf.
    Leaf { value: f64, cover: f64 },
}

impl Node {
    pub fn cover(&self) -> f64 {
        match self {
            Node::Split { cover, .. } | Node::Leaf { cover, .. } => *cover,
        }
    }
}

/// A decision tree stored as a flat node array, root first.
///
/// Children always sit after their parent, which validation enforces and
/// which keeps traversal free of cycles.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

impl Tree {
    /// Index of the child `x` follows at a split node.
    #[inline]
    pub fn next(x: &[f64], feature: usize, threshold: f64, left: usize, right: usize) -> usize {
        if x[feature] <= threshold {
            left
        } else {
            right
        }
    }

    /// Leaf value reached by `x`.
    pub fn predict(&self, x: &[f64]) -> f64 {
        let mut index = 0;
        loop {
            match self.nodes[index] {
                Node::Leaf { value, .. } => return value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    ..
                } => index = Self::next(x, feature, threshold, left, right),
            }
        }
    }

    /// Output expected when no feature is known: each split is replaced by
    /// the cover-weighted average of its children.
    pub fn expected_value(&self) -> f64 {
        // Children come after parents, so a reverse sweep sees them first.
        let mut expected = vec![0.0; self.nodes.len()];
        for (index, node) in self.nodes.iter().enumerate().rev() {
            expected[index] = match *node {
                Node::Leaf { value, .. } => value,
                Node::Split {
                    left, right, cover, ..
                } => {
                    let left_cover = self.nodes[left].cover();
                    let right_cover = self.nodes[right].cover();
                    (left_cover * expected[left] + right_cover * expected[right]) / cover
                }
            };
        }
        expected[0]
    }

    pub fn depth(&self) -> usize {
        let mut depth = vec![0usize; self.nodes.len()];
        let mut max_depth = 0;
        for (index, node) in self.nodes.iter().enumerate() {
            if let Node::Split { left, right, .. } = *node {
                depth[left] = depth[index] + 1;
                depth[right] = depth[index] + 1;
                max_depth = max_depth.max(depth[index] + 1);
            }
        }
        max_depth
    }
}
