use super::forest::Forest;
use super::tree::Node;

/// Deepest tree accepted. Attribution walks each path recursively, one frame
/// per level.
pub const MAX_TREE_DEPTH: usize = 256;

/// Relative tolerance when checking that a split's cover is the sum of its
/// children's covers.
const COVER_TOLERANCE: f64 = 1e-9;

/// Validate a forest against the number of features it will be fed.
/// Returns all problems at once (not just the first).
pub fn validate_forest(forest: &Forest, feature_count: usize) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if forest.trees.is_empty() {
        errors.push("forest.trees: at least one tree is required".to_string());
    }

    for (t, tree) in forest.trees.iter().enumerate() {
        let at = format!("forest.trees[{}]", t);
        let len = tree.nodes.len();

        if len == 0 {
            errors.push(format!("{}.nodes: tree has no nodes", at));
            continue;
        }

        // Every node except the root must be the child of exactly one split.
        let mut parents = vec![0usize; len];
        let mut depth = vec![0usize; len];
        let mut max_depth = 0;

        for (n, node) in tree.nodes.iter().enumerate() {
            let at = format!("{}.nodes[{}]", at, n);
            let cover = node.cover();
            if !(cover.is_finite() && cover > 0.0) {
                errors.push(format!("{}.cover: must be a positive number", at));
            }

            match *node {
                Node::Leaf { value, .. } => {
                    if !(0.0..=1.0).contains(&value) {
                        errors.push(format!(
                            "{}.value: leaf probability must be within [0, 1] (got {})",
                            at, value
                        ));
                    }
                }
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    cover,
                } => {
                    if feature >= feature_count {
                        errors.push(format!(
                            "{}.feature: index {} is out of range for {} features",
                            at, feature, feature_count
                        ));
                    }
                    if !threshold.is_finite() {
                        errors.push(format!("{}.threshold: must be finite", at));
                    }
                    let mut children_ok = true;
                    for (side, child) in [("left", left), ("right", right)] {
                        if child <= n || child >= len {
                            errors.push(format!(
                                "{}.{}: child index {} must point forward inside the tree",
                                at, side, child
                            ));
                            children_ok = false;
                        } else {
                            parents[child] += 1;
                            depth[child] = depth[n] + 1;
                            max_depth = max_depth.max(depth[child]);
                        }
                    }
                    if children_ok && cover.is_finite() {
                        let children = tree.nodes[left].cover() + tree.nodes[right].cover();
                        let consistent = (cover - children).abs() <= COVER_TOLERANCE * cover.abs();
                        if !consistent {
                            errors.push(format!(
                                "{}.cover: {} does not equal the sum of its children's covers ({})",
                                at, cover, children
                            ));
                        }
                    }
                    if left == right {
                        errors.push(format!("{}: left and right are the same node", at));
                    }
                }
            }
        }

        if max_depth > MAX_TREE_DEPTH {
            errors.push(format!(
                "{}: depth {} exceeds the maximum of {}",
                at, max_depth, MAX_TREE_DEPTH
            ));
        }

        for (n, count) in parents.iter().enumerate().skip(1) {
            if *count != 1 {
                errors.push(format!(
                    "{}.nodes[{}]: referenced by {} parents (expected exactly 1)",
                    at, n, count
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
