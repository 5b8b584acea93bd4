//! Ensembl Variant Effect Predictor (REST).
//!
//! Endpoint: {base}/vep/human/id/{id}?content-type=application/json
//! The response is a list with one record per input id; the first is kept.

use std::sync::Arc;

use async_trait::async_trait;
use genannot_common::{
    AnnotationResult, AnnotatorError, FetchOutcome, HttpConfig, HttpTransport, RateLimitedClient,
    SourcesConfig,
};
use serde_json::{Map, Value};
use tracing::instrument;

use super::{endpoint, finish, into_record, require_content, VariantAnnotator};

pub const SOURCE_NAME: &str = "ensembl_vep";

pub struct EnsemblVepClient {
    client: RateLimitedClient,
    base_url: String,
}

impl EnsemblVepClient {
    pub fn new(transport: Arc<dyn HttpTransport>, http: &HttpConfig, sources: &SourcesConfig) -> Self {
        Self {
            client: RateLimitedClient::new(transport, http),
            base_url: sources.ensembl_url.clone(),
        }
    }

    #[instrument(skip(self))]
    async fn lookup(&self, variant_id: &str) -> Result<Map<String, Value>, AnnotatorError> {
        let url = endpoint(&self.base_url, &format!("vep/human/id/{}", variant_id));
        let params = [("content-type", "application/json".to_string())];

        match self.client.fetch(&url, &params).await {
            FetchOutcome::Found(payload) => {
                let record = into_record(payload, "Ensembl VEP")?;
                require_content(record, &format!("Ensembl VEP returned an empty record for {variant_id}"))
            }
            FetchOutcome::NotFound => Err(AnnotatorError::NotFound(format!("{variant_id} in Ensembl VEP"))),
            FetchOutcome::Failed(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl VariantAnnotator for EnsemblVepClient {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    async fn annotate(&self, variant_id: &str) -> AnnotationResult {
        finish(SOURCE_NAME, variant_id, self.lookup(variant_id).await)
    }
}
