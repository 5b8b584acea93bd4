//! MyVariant.info client.
//!
//! Endpoint: {base}/variant/{id}?fields=cadd.phred,clinvar,dbnsfp,gnomad_exome.af,gnomad_genome.af
//!
//! Unknown ids often come back 200 with only `_id`/`_version`; those count as
//! "no data". This is the only source the scorer reads.

use std::sync::Arc;

use async_trait::async_trait;
use genannot_common::{
    AnnotationResult, AnnotatorError, FetchOutcome, HttpConfig, HttpTransport, RateLimitedClient,
    SourcesConfig,
};
use serde_json::{Map, Value};
use tracing::instrument;

use super::{endpoint, finish, into_record, require_content, VariantAnnotator};

pub const SOURCE_NAME: &str = "myvariant";

pub struct MyVariantClient {
    client: RateLimitedClient,
    base_url: String,
    fields: String,
}

impl MyVariantClient {
    pub fn new(transport: Arc<dyn HttpTransport>, http: &HttpConfig, sources: &SourcesConfig) -> Self {
        Self {
            client: RateLimitedClient::new(transport, http),
            base_url: sources.myvariant_url.clone(),
            fields: sources.myvariant_fields.clone(),
        }
    }

    #[instrument(skip(self))]
    async fn lookup(&self, variant_id: &str) -> Result<Map<String, Value>, AnnotatorError> {
        let url = endpoint(&self.base_url, &format!("variant/{}", variant_id));
        let params = [("fields", self.fields.clone())];

        match self.client.fetch(&url, &params).await {
            FetchOutcome::Found(payload) => {
                let record = into_record(payload, "MyVariant")?;
                require_content(record, &format!("MyVariant has no annotations for {variant_id}"))
            }
            FetchOutcome::NotFound => Err(AnnotatorError::NotFound(format!("{variant_id} in MyVariant"))),
            FetchOutcome::Failed(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl VariantAnnotator for MyVariantClient {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    async fn annotate(&self, variant_id: &str) -> AnnotationResult {
        finish(SOURCE_NAME, variant_id, self.lookup(variant_id).await)
    }
}
