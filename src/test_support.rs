//! Shared fixtures for unit tests.
//!
//! The scenario model has four identity-scaled features (income, debt,
//! employment_years, credit_history_months) and answers 0.732 for
//! `[4200, 800, 3, 24]`.

use crate::encoder::{EncoderTable, Encoding, FeatureSpec, Scaling};
use crate::model::{Forest, ModelArtifact, Node, ScoringModel, Tree, MODEL_FORMAT_VERSION};
use crate::record::{Attribute, ClientRecord};

pub const SCENARIO_VERSION: &str = "scenario-2024.1";

/// income <= 3000 ? 0.30 : (debt <= 1500 ? (employment_years <= 1 ? 0.55 : 0.81) : 0.40)
pub fn income_tree() -> Tree {
    Tree {
        nodes: vec![
            Node::Split { feature: 0, threshold: 3000.0, left: 1, right: 2, cover: 100.0 },
            Node::Leaf { value: 0.30, cover: 40.0 },
            Node::Split { feature: 1, threshold: 1500.0, left: 3, right: 6, cover: 60.0 },
            Node::Split { feature: 2, threshold: 1.0, left: 4, right: 5, cover: 45.0 },
            Node::Leaf { value: 0.55, cover: 10.0 },
            Node::Leaf { value: 0.81, cover: 35.0 },
            Node::Leaf { value: 0.40, cover: 15.0 },
        ],
    }
}

/// credit_history_months <= 12 ? 0.25 : (income <= 2500 ? 0.45 : (debt <= 1000 ? 0.654 : 0.50))
pub fn history_tree() -> Tree {
    Tree {
        nodes: vec![
            Node::Split { feature: 3, threshold: 12.0, left: 1, right: 2, cover: 100.0 },
            Node::Leaf { value: 0.25, cover: 30.0 },
            Node::Split { feature: 0, threshold: 2500.0, left: 3, right: 4, cover: 70.0 },
            Node::Leaf { value: 0.45, cover: 20.0 },
            Node::Split { feature: 1, threshold: 1000.0, left: 5, right: 6, cover: 50.0 },
            Node::Leaf { value: 0.654, cover: 38.0 },
            Node::Leaf { value: 0.50, cover: 12.0 },
        ],
    }
}

/// Splits on income three times along one path, and on debt once.
pub fn repeated_split_tree() -> Tree {
    Tree {
        nodes: vec![
            Node::Split { feature: 0, threshold: 3000.0, left: 1, right: 2, cover: 100.0 },
            Node::Split { feature: 0, threshold: 1000.0, left: 3, right: 4, cover: 40.0 },
            Node::Split { feature: 1, threshold: 500.0, left: 5, right: 6, cover: 60.0 },
            Node::Leaf { value: 0.1, cover: 10.0 },
            Node::Leaf { value: 0.3, cover: 30.0 },
            Node::Split { feature: 0, threshold: 6000.0, left: 7, right: 8, cover: 25.0 },
            Node::Leaf { value: 0.7, cover: 35.0 },
            Node::Leaf { value: 0.6, cover: 15.0 },
            Node::Leaf { value: 0.9, cover: 10.0 },
        ],
    }
}

/// `depth` splits on feature 0 in a row, each with a leaf on its left.
/// Covers add up at every split.
pub fn chain_tree(depth: usize) -> Tree {
    let mut nodes = Vec::with_capacity(2 * depth + 1);
    for level in 0..depth {
        let at = nodes.len();
        nodes.push(Node::Split {
            feature: 0,
            threshold: level as f64,
            left: at + 1,
            right: at + 2,
            cover: (depth - level + 1) as f64,
        });
        nodes.push(Node::Leaf { value: 0.2, cover: 1.0 });
    }
    nodes.push(Node::Leaf { value: 0.7, cover: 1.0 });
    Tree { nodes }
}

pub fn scenario_forest() -> Forest {
    Forest {
        trees: vec![income_tree(), history_tree()],
    }
}

pub fn scenario_table() -> EncoderTable {
    let numeric = |attribute, default| FeatureSpec {
        attribute,
        encoding: Encoding::Numeric {
            default,
            min: Some(0.0),
            max: None,
            scaling: Scaling::Identity,
        },
    };
    EncoderTable {
        features: vec![
            numeric(Attribute::Income, None),
            numeric(Attribute::Debt, Some(0.0)),
            numeric(Attribute::EmploymentYears, None),
            numeric(Attribute::CreditHistoryMonths, None),
        ],
    }
}

pub fn scenario_artifact() -> ModelArtifact {
    ModelArtifact {
        format_version: MODEL_FORMAT_VERSION,
        model_version: SCENARIO_VERSION.to_string(),
        created_at: None,
        feature_count: 4,
        encoder: scenario_table(),
        forest: scenario_forest(),
    }
}

pub fn scenario_model() -> ScoringModel {
    ScoringModel::new(
        SCENARIO_VERSION,
        scenario_table().feature_names(),
        scenario_forest(),
    )
    .unwrap()
}

pub fn scenario_record() -> ClientRecord {
    ClientRecord {
        income: Some(4200.0),
        debt: Some(800.0),
        employment_years: Some(3.0),
        credit_history_months: Some(24.0),
        ..Default::default()
    }
}
