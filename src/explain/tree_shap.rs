//! Exact path-dependent TreeSHAP for a single tree.
//!
//! Walks every root-to-leaf path once, keeping for each feature met on the
//! path the fraction of "feature known" (`one_fraction`) and "feature
//! unknown" (`zero_fraction`) weight that flows through it, plus the
//! permutation weights of every subset size. At a leaf, each feature on the
//! path receives its Shapley share of the leaf value.
//!
//! The result equals the Shapley values of the conditional expectation
//! `E[f(x) | x_S]` where unknown features follow training covers, computed in
//! `O(leaves * depth^2)` instead of enumerating all `2^n` subsets. There is
//! no sampling, so results are bit-identical across calls.

use crate::model::{Node, Tree};

#[derive(Debug, Clone, Copy)]
struct PathElement {
    /// `None` for the sentinel at the root of the path.
    feature: Option<usize>,
    zero_fraction: f64,
    one_fraction: f64,
    weight: f64,
}

/// Add the tree's attributions for `x` into `phi` (one slot per feature).
pub fn accumulate(tree: &Tree, x: &[f64], phi: &mut [f64]) {
    let mut walk = Walk { tree, x, phi };
    walk.recurse(0, &[], 1.0, 1.0, None);
}

struct Walk<'a> {
    tree: &'a Tree,
    x: &'a [f64],
    phi: &'a mut [f64],
}

impl Walk<'_> {
    fn recurse(
        &mut self,
        index: usize,
        parent_path: &[PathElement],
        zero_fraction: f64,
        one_fraction: f64,
        feature: Option<usize>,
    ) {
        let mut path = Vec::with_capacity(parent_path.len() + 1);
        path.extend_from_slice(parent_path);
        extend(&mut path, zero_fraction, one_fraction, feature);

        match self.tree.nodes[index] {
            Node::Leaf { value, .. } => {
                for i in 1..path.len() {
                    let weight = unwound_sum(&path, i);
                    let element = path[i];
                    if let Some(f) = element.feature {
                        self.phi[f] +=
                            weight * (element.one_fraction - element.zero_fraction) * value;
                    }
                }
            }
            Node::Split {
                feature: split,
                threshold,
                left,
                right,
                cover,
            } => {
                let hot = Tree::next(self.x, split, threshold, left, right);
                let cold = if hot == left { right } else { left };
                let hot_zero = self.tree.nodes[hot].cover() / cover;
                let cold_zero = self.tree.nodes[cold].cover() / cover;

                // A feature split on again further down keeps one slot on the path.
                let mut incoming_zero = 1.0;
                let mut incoming_one = 1.0;
                if let Some(k) = path.iter().position(|e| e.feature == Some(split)) {
                    incoming_zero = path[k].zero_fraction;
                    incoming_one = path[k].one_fraction;
                    unwind(&mut path, k);
                }

                self.recurse(hot, &path, hot_zero * incoming_zero, incoming_one, Some(split));
                self.recurse(cold, &path, cold_zero * incoming_zero, 0.0, Some(split));
            }
        }
    }
}

fn extend(path: &mut Vec<PathElement>, zero_fraction: f64, one_fraction: f64, feature: Option<usize>) {
    let depth = path.len();
    path.push(PathElement {
        feature,
        zero_fraction,
        one_fraction,
        weight: if depth == 0 { 1.0 } else { 0.0 },
    });
    let d = depth as f64;
    for i in (0..depth).rev() {
        let fi = i as f64;
        path[i + 1].weight += one_fraction * path[i].weight * (fi + 1.0) / (d + 1.0);
        path[i].weight = zero_fraction * path[i].weight * (d - fi) / (d + 1.0);
    }
}

/// Remove element `k` from the path, undoing its effect on the weights.
fn unwind(path: &mut Vec<PathElement>, k: usize) {
    let depth = path.len() - 1;
    let d = depth as f64;
    let one = path[k].one_fraction;
    let zero = path[k].zero_fraction;
    let mut next_one_portion = path[depth].weight;

    for i in (0..depth).rev() {
        let fi = i as f64;
        if one != 0.0 {
            let previous = path[i].weight;
            path[i].weight = next_one_portion * (d + 1.0) / ((fi + 1.0) * one);
            next_one_portion = previous - path[i].weight * zero * (d - fi) / (d + 1.0);
        } else {
            path[i].weight = path[i].weight * (d + 1.0) / (zero * (d - fi));
        }
    }

    for i in k..depth {
        path[i].feature = path[i + 1].feature;
        path[i].zero_fraction = path[i + 1].zero_fraction;
        path[i].one_fraction = path[i + 1].one_fraction;
    }
    path.pop();
}

/// Total weight the path would have with element `k` unwound, without
/// modifying it.
fn unwound_sum(path: &[PathElement], k: usize) -> f64 {
    let depth = path.len() - 1;
    let d = depth as f64;
    let one = path[k].one_fraction;
    let zero = path[k].zero_fraction;
    let mut next_one_portion = path[depth].weight;
    let mut total = 0.0;

    if one != 0.0 {
        for i in (0..depth).rev() {
            let fi = i as f64;
            let share = next_one_portion / ((fi + 1.0) * one);
            total += share;
            next_one_portion = path[i].weight - share * zero * (d - fi);
        }
    } else {
        for i in (0..depth).rev() {
            total += path[i].weight / (zero * (d - i as f64));
        }
    }
    total * (d + 1.0)
}
