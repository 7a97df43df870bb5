use super::forest::Forest;
use super::validation::validate_forest;
use crate::encoder::FeatureVector;
use crate::error::{Error, ModelLoadError, ShapeError, VersionMismatchError};

/// The loaded classifier. Immutable after construction; share it with `Arc`.
#[derive(Debug, Clone)]
pub struct ScoringModel {
    version: String,
    feature_names: Vec<String>,
    forest: Forest,
}

impl ScoringModel {
    pub fn new(
        version: impl Into<String>,
        feature_names: Vec<String>,
        forest: Forest,
    ) -> Result<Self, ModelLoadError> {
        validate_forest(&forest, feature_names.len())
            .map_err(|problems| ModelLoadError::Invalid { problems })?;
        Ok(Self {
            version: version.into(),
            feature_names,
            forest,
        })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn feature_count(&self) -> usize {
        self.feature_names.len()
    }

    pub fn forest(&self) -> &Forest {
        &self.forest
    }

    /// Probability of the positive class (eligible).
    ///
    /// A vector of the wrong length is a [`ShapeError`]; it is never padded
    /// or truncated.
    pub fn predict_proba(&self, vector: &FeatureVector) -> Result<f64, Error> {
        self.check_vector(vector)?;
        Ok(self.forest.predict(vector.values()))
    }

    /// Output expected with no evidence about the client.
    pub fn expected_value(&self) -> f64 {
        self.forest.expected_value()
    }

    /// Reject vectors this model cannot consume: wrong length first, then a
    /// vector encoded by another model version's table.
    pub fn check_vector(&self, vector: &FeatureVector) -> Result<(), Error> {
        if vector.len() != self.feature_count() {
            return Err(ShapeError {
                expected: self.feature_count(),
                actual: vector.len(),
            }
            .into());
        }
        if vector.model_version() != self.version {
            return Err(VersionMismatchError {
                component: "feature vector",
                expected: self.version.clone(),
                found: vector.model_version().to_string(),
                detail: None,
            }
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{scenario_model, SCENARIO_VERSION};

    #[test]
    fn test_predict_scenario() {
        let model = scenario_model();
        let vector = FeatureVector::new(SCENARIO_VERSION, vec![4200.0, 800.0, 3.0, 24.0]);
        let p = model.predict_proba(&vector).unwrap();
        assert!((p - 0.732).abs() < 1e-12);
    }

    #[test]
    fn test_predict_is_deterministic() {
        let model = scenario_model();
        let vector = FeatureVector::new(SCENARIO_VERSION, vec![2750.0, 1200.0, 0.5, 13.0]);
        let first = model.predict_proba(&vector).unwrap();
        for _ in 0..100 {
            assert_eq!(model.predict_proba(&vector).unwrap().to_bits(), first.to_bits());
        }
    }

    #[test]
    fn test_wrong_length_is_shape_error() {
        let model = scenario_model();
        for values in [vec![4200.0, 800.0, 3.0], vec![4200.0, 800.0, 3.0, 24.0, 1.0], vec![]] {
            let len = values.len();
            let err = model
                .predict_proba(&FeatureVector::new(SCENARIO_VERSION, values))
                .unwrap_err();
            match err {
                Error::Shape(e) => {
                    assert_eq!(e.expected, 4);
                    assert_eq!(e.actual, len);
                }
                other => panic!("expected a shape error, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_foreign_vector_is_version_mismatch() {
        let model = scenario_model();
        let vector = FeatureVector::new("some-other-model", vec![4200.0, 800.0, 3.0, 24.0]);
        let err = model.predict_proba(&vector).unwrap_err();
        assert!(matches!(err, Error::VersionMismatch(_)));
    }

    #[test]
    fn test_probability_bounds() {
        let model = scenario_model();
        for values in [
            vec![0.0, 0.0, 0.0, 0.0],
            vec![1e9, 0.0, 50.0, 600.0],
            vec![1e9, 1e9, 50.0, 0.0],
        ] {
            let p = model
                .predict_proba(&FeatureVector::new(SCENARIO_VERSION, values))
                .unwrap();
            assert!((0.0..=1.0).contains(&p));
        }
    }

    #[test]
    fn test_invalid_forest_fails_to_load() {
        let result = ScoringModel::new(
            "v1",
            vec!["income".to_string()],
            crate::test_support::scenario_forest(),
        );
        assert!(matches!(result, Err(ModelLoadError::Invalid { .. })));
    }

    #[test]
    fn test_too_deep_forest_fails_to_load() {
        let forest = Forest {
            trees: vec![crate::test_support::chain_tree(5_000)],
        };
        match ScoringModel::new("v1", vec!["income".to_string()], forest) {
            Err(ModelLoadError::Invalid { problems }) => {
                assert!(problems.iter().any(|p| p.contains("exceeds the maximum")));
            }
            other => panic!("expected an invalid-artifact error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_deepest_allowed_forest_is_explainable() {
        use crate::explain::AttributionEngine;
        use std::sync::Arc;

        let depth = crate::model::MAX_TREE_DEPTH;
        let forest = Forest {
            trees: vec![crate::test_support::chain_tree(depth)],
        };
        let model = Arc::new(ScoringModel::new("v1", vec!["income".to_string()], forest).unwrap());
        let vector = FeatureVector::new("v1", vec![depth as f64 + 1.0]);
        let p = model.predict_proba(&vector).unwrap();
        assert_eq!(p, 0.7);

        let attributions = AttributionEngine::new(Arc::clone(&model)).explain(&vector).unwrap();
        assert!((attributions.reconstructed() - p).abs() < 1e-6);
    }
}
