//! Annotation orchestrator.
//!
//! Fans one key out to every adapter of the matching family and folds the
//! envelopes into an [`AnnotationSet`]:
//!   1. Look up the adapters for the key type (identifier or coordinate)
//!   2. Run them concurrently, one future per adapter
//!   3. Collect exactly one envelope per adapter, keyed by registry name
//!
//! Batches run keys independently with a bounded number in flight and keep
//! input order. Nothing here fails because a source failed.

use std::collections::BTreeMap;
use std::sync::Arc;

use futures::future::join_all;
use futures::stream::{self, StreamExt};
use genannot_common::{
    AnnotationSet, AnnotatorConfig, AnnotatorError, GenomicPosition, HttpTransport, ReqwestTransport,
};
use genannot_scorer::{ScoreDetail, ScoreResult, VariantScorer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, instrument};

use crate::registry::AnnotatorRegistry;

/// One row of a batch run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantReport {
    pub variant_id: String,
    /// Registry names of the adapters that returned data, sorted.
    pub successful_sources: Vec<String>,
    pub total_score: f64,
    pub score_details: BTreeMap<String, ScoreDetail>,
    /// Data of every successful annotation, keyed by registry name.
    pub annotations: BTreeMap<String, Map<String, Value>>,
}

impl VariantReport {
    pub fn from_results(variant_id: impl Into<String>, results: AnnotationSet, score: ScoreResult) -> Self {
        let mut successful_sources = Vec::new();
        let mut annotations = BTreeMap::new();
        for (name, result) in results {
            if result.success {
                successful_sources.push(name.clone());
                annotations.insert(name, result.data);
            }
        }
        Self {
            variant_id: variant_id.into(),
            successful_sources,
            total_score: score.total,
            score_details: score.details,
            annotations,
        }
    }
}

pub struct GenomicAnnotator {
    registry: Arc<AnnotatorRegistry>,
    scorer: VariantScorer,
    max_concurrent_variants: usize,
}

impl GenomicAnnotator {
    /// Validate the config and wire every adapter to a real HTTP transport.
    pub fn from_config(config: &AnnotatorConfig) -> Result<Self, AnnotatorError> {
        config.validate()?;
        let transport = Arc::new(ReqwestTransport::new(&config.http)?);
        Ok(Self::with_transport(config, transport))
    }

    /// Same wiring over a caller-supplied transport.
    pub fn with_transport(config: &AnnotatorConfig, transport: Arc<dyn HttpTransport>) -> Self {
        let registry = AnnotatorRegistry::from_config(config, transport);
        let scorer = VariantScorer::new(config.scoring.clone());
        Self::new(registry, scorer, config.execution.max_concurrent_variants)
    }

    pub fn new(registry: AnnotatorRegistry, scorer: VariantScorer, max_concurrent_variants: usize) -> Self {
        Self {
            registry: Arc::new(registry),
            scorer,
            max_concurrent_variants: max_concurrent_variants.max(1),
        }
    }

    /// Annotate a variant identifier with every identifier-keyed source.
    #[instrument(skip(self))]
    pub async fn annotate_variant(&self, variant_id: &str) -> AnnotationSet {
        let calls = self.registry.variant_adapters().map(|(name, adapter)| async move {
            info!(variant = variant_id, source = name, "Querying source");
            (name.to_string(), adapter.annotate(variant_id).await)
        });
        let results: AnnotationSet = join_all(calls).await.into_iter().collect();

        debug!(
            variant = variant_id,
            succeeded = results.values().filter(|r| r.success).count(),
            total = results.len(),
            "Variant annotated"
        );
        results
    }

    /// Annotate a position with every coordinate-keyed source.
    #[instrument(skip(self), fields(position = %position))]
    pub async fn annotate_position(&self, position: &GenomicPosition) -> AnnotationSet {
        let calls = self.registry.position_adapters().map(|(name, adapter)| async move {
            info!(position = %position, source = name, "Querying source");
            (name.to_string(), adapter.annotate(position).await)
        });
        join_all(calls).await.into_iter().collect()
    }

    pub fn score_variant(&self, results: &AnnotationSet) -> ScoreResult {
        self.scorer.score(results)
    }

    /// Annotate and score one variant.
    pub async fn report_variant(&self, variant_id: &str) -> VariantReport {
        let results = self.annotate_variant(variant_id).await;
        let score = self.score_variant(&results);
        VariantReport::from_results(variant_id, results, score)
    }

    /// Annotate and score many variants. Output order matches input order.
    #[instrument(skip(self, variant_ids), fields(count = variant_ids.len()))]
    pub async fn annotate_variants_batch(&self, variant_ids: &[String]) -> Vec<VariantReport> {
        info!(
            count = variant_ids.len(),
            max_in_flight = self.max_concurrent_variants,
            "Starting batch annotation"
        );
        stream::iter(variant_ids)
            .map(|id| self.report_variant(id))
            .buffered(self.max_concurrent_variants)
            .collect()
            .await
    }
}
