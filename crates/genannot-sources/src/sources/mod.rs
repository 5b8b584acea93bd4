//! Annotation source clients.

pub mod myvariant;
pub mod ensembl_vep;
pub mod clinvar;
pub mod ucsc;

use async_trait::async_trait;
use genannot_common::{AnnotationResult, AnnotatorError, GenomicPosition};
use serde_json::{Map, Value};
use tracing::{debug, warn};

pub use clinvar::ClinVarClient;
pub use ensembl_vep::EnsemblVepClient;
pub use myvariant::MyVariantClient;
pub use ucsc::ConservationClient;

/// Sources keyed by a variant identifier (rsID or HGVS-like string).
#[async_trait]
pub trait VariantAnnotator: Send + Sync {
    /// Source name reported in every envelope.
    fn name(&self) -> &str;

    /// Never fails: every problem becomes `success = false`.
    async fn annotate(&self, variant_id: &str) -> AnnotationResult;
}

/// Sources keyed by a genomic coordinate.
#[async_trait]
pub trait PositionAnnotator: Send + Sync {
    fn name(&self) -> &str;

    async fn annotate(&self, position: &GenomicPosition) -> AnnotationResult;
}

// ── Shared normalisation ─────────────────────────────────────────────────────

/// Join a configured base URL and a path without doubling slashes.
pub(crate) fn endpoint(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// A payload whose keys are all `_`-prefixed carries no annotation.
pub fn is_metadata_only(record: &Map<String, Value>) -> bool {
    record.keys().all(|k| k.starts_with('_'))
}

/// Reduce a response body to one record: objects as-is, lists by their first
/// element. Anything else is empty.
pub(crate) fn into_record(payload: Value, what: &str) -> Result<Map<String, Value>, AnnotatorError> {
    match payload {
        Value::Object(map) => Ok(map),
        Value::Array(items) => match items.into_iter().next() {
            Some(Value::Object(map)) => Ok(map),
            Some(_) => Err(AnnotatorError::EmptyPayload(format!("{what}: first list element is not a record"))),
            None => Err(AnnotatorError::EmptyPayload(format!("{what}: empty list"))),
        },
        _ => Err(AnnotatorError::EmptyPayload(format!("{what}: unexpected response shape"))),
    }
}

/// Reject empty and metadata-only records.
pub(crate) fn require_content(record: Map<String, Value>, what: &str) -> Result<Map<String, Value>, AnnotatorError> {
    if is_metadata_only(&record) {
        return Err(AnnotatorError::EmptyPayload(what.to_string()));
    }
    Ok(record)
}

/// Fold a lookup into the envelope, logging failures.
pub(crate) fn finish(
    source: &str,
    key: &str,
    lookup: Result<Map<String, Value>, AnnotatorError>,
) -> AnnotationResult {
    match &lookup {
        Ok(data) => debug!(source, key, fields = data.len(), "Annotation succeeded"),
        Err(e) => warn!(source, key, error = %e, "Annotation failed"),
    }
    AnnotationResult::from_lookup(source, lookup)
}
