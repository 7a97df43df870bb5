use rayon::prelude::*;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::report::ScoreReport;
use crate::encoder::{Encoder, FeatureVector};
use crate::error::Error;
use crate::explain::{AttributionEngine, ExplainerArtifact};
use crate::model::{ModelArtifact, ScoringModel};
use crate::policy::DecisionPolicy;
use crate::record::ClientRecord;

/// Where the two artifacts live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub explainer: PathBuf,
}

/// The loaded pipeline: encoder, model, attribution engine and policy.
///
/// Built once at startup and then only read, so one instance can serve any
/// number of threads without locking.
#[derive(Debug, Clone)]
pub struct Scorer {
    encoder: Encoder,
    model: Arc<ScoringModel>,
    engine: AttributionEngine,
    policy: DecisionPolicy,
}

impl Scorer {
    /// Load both artifacts from disk and bind them together.
    pub fn load(paths: &ArtifactPaths, policy: DecisionPolicy) -> Result<Self, Error> {
        let model = ModelArtifact::load(&paths.model)?;
        let explainer = ExplainerArtifact::load(&paths.explainer)?;
        Self::from_artifacts(model, &explainer, policy)
    }

    pub fn from_artifacts(
        model: ModelArtifact,
        explainer: &ExplainerArtifact,
        policy: DecisionPolicy,
    ) -> Result<Self, Error> {
        let (encoder, model) = model.into_parts()?;
        let model = Arc::new(model);
        let engine = AttributionEngine::from_artifact(Arc::clone(&model), explainer)?;
        info!(
            model_version = %model.version(),
            features = model.feature_count(),
            trees = model.forest().trees.len(),
            threshold = policy.threshold(),
            "Scorer ready"
        );
        Ok(Self {
            encoder,
            model,
            engine,
            policy,
        })
    }

    pub fn encoder(&self) -> &Encoder {
        &self.encoder
    }

    pub fn model(&self) -> &ScoringModel {
        &self.model
    }

    pub fn engine(&self) -> &AttributionEngine {
        &self.engine
    }

    pub fn policy(&self) -> &DecisionPolicy {
        &self.policy
    }

    pub fn encode(&self, record: &ClientRecord) -> Result<FeatureVector, Error> {
        Ok(self.encoder.encode(record)?)
    }

    /// Run one record through the whole pipeline.
    pub fn score(&self, record: &ClientRecord) -> Result<ScoreReport, Error> {
        let vector = self.encoder.encode(record)?;
        let probability = self.model.predict_proba(&vector)?;
        let attributions = self.engine.explain(&vector)?;
        let decision = self.policy.decide(probability);

        debug!(
            probability,
            verdict = %decision.verdict,
            confidence = %decision.confidence_band,
            "Record scored"
        );
        Ok(ScoreReport::new(decision, attributions, self.model.version()))
    }

    /// Score records in parallel. Results come back in input order, one per
    /// record; a rejected record does not affect the others.
    pub fn score_batch(&self, records: &[ClientRecord]) -> Vec<Result<ScoreReport, Error>> {
        records
            .par_iter()
            .enumerate()
            .map(|(index, record)| {
                let result = self.score(record);
                if let Err(e) = &result {
                    warn!(index, code = e.error_code(), error = %e, "Record rejected");
                }
                result
            })
            .collect()
    }
}
