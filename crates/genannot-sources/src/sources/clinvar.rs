//! ClinVar via NCBI E-utilities.
//!
//! Two phases, no retries:
//!   esearch: {base}/esearch.fcgi?db=clinvar&term={id}&retmode=json&retmax=5
//!   esummary: {base}/esummary.fcgi?db=clinvar&id={uid}&retmode=json
//!
//! An empty esearch id list ends the lookup; esummary is never called.

use std::sync::Arc;

use async_trait::async_trait;
use genannot_common::{
    AnnotationResult, AnnotatorError, FetchOutcome, HttpConfig, HttpTransport, RateLimitedClient,
    SourcesConfig,
};
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use super::{endpoint, finish, VariantAnnotator};

pub const SOURCE_NAME: &str = "clinvar";

const ESEARCH_RETMAX: u32 = 5;

pub struct ClinVarClient {
    client: RateLimitedClient,
    base_url: String,
}

impl ClinVarClient {
    pub fn new(transport: Arc<dyn HttpTransport>, http: &HttpConfig, sources: &SourcesConfig) -> Self {
        Self {
            client: RateLimitedClient::new(transport, http),
            base_url: sources.eutils_url.clone(),
        }
    }

    /// Search ClinVar and return the matching internal ids.
    #[instrument(skip(self))]
    async fn esearch(&self, term: &str) -> Result<Vec<String>, AnnotatorError> {
        let url = endpoint(&self.base_url, "esearch.fcgi");
        let params = [
            ("db", "clinvar".to_string()),
            ("term", term.to_string()),
            ("retmode", "json".to_string()),
            ("retmax", ESEARCH_RETMAX.to_string()),
        ];

        let resp = match self.client.fetch(&url, &params).await {
            FetchOutcome::Found(v) => v,
            FetchOutcome::NotFound => return Ok(vec![]),
            FetchOutcome::Failed(e) => return Err(e.into()),
        };

        let ids: Vec<String> = resp["esearchresult"]["idlist"]
            .as_array()
            .map(|ids| {
                ids.iter()
                    .filter_map(|v| match v {
                        Value::String(s) => Some(s.clone()),
                        Value::Number(n) => Some(n.to_string()),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default();

        debug!(?ids, "ClinVar esearch returned ids");
        Ok(ids)
    }

    /// Fetch the summary record for one internal id.
    #[instrument(skip(self))]
    async fn esummary(&self, uid: &str) -> Result<Map<String, Value>, AnnotatorError> {
        let url = endpoint(&self.base_url, "esummary.fcgi");
        let params = [
            ("db", "clinvar".to_string()),
            ("id", uid.to_string()),
            ("retmode", "json".to_string()),
        ];

        let resp = match self.client.fetch(&url, &params).await {
            FetchOutcome::Found(v) => v,
            FetchOutcome::NotFound => {
                return Err(AnnotatorError::NotFound(format!("ClinVar summary for uid {uid}")))
            }
            FetchOutcome::Failed(e) => return Err(e.into()),
        };

        match resp["result"].get(uid) {
            Some(Value::Object(record)) if !record.is_empty() => Ok(record.clone()),
            _ => Err(AnnotatorError::EmptyPayload(format!("no ClinVar summary for uid {uid}"))),
        }
    }

    async fn lookup(&self, variant_id: &str) -> Result<Map<String, Value>, AnnotatorError> {
        let ids = self.esearch(variant_id).await?;
        let Some(uid) = ids.first() else {
            return Err(AnnotatorError::NotFound(format!("{variant_id} in ClinVar")));
        };
        self.esummary(uid).await
    }
}

#[async_trait]
impl VariantAnnotator for ClinVarClient {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    async fn annotate(&self, variant_id: &str) -> AnnotationResult {
        finish(SOURCE_NAME, variant_id, self.lookup(variant_id).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use genannot_common::AnnotatorConfig;
    use genannot_test_utils::{fixtures, Reply, ScriptedTransport};
    use serde_json::json;

    fn client(transport: Arc<ScriptedTransport>) -> ClinVarClient {
        let mut config = AnnotatorConfig::default();
        config.http.min_interval_ms = 0;
        ClinVarClient::new(transport, &config.http, &config.sources)
    }

    #[tokio::test]
    async fn test_two_phase_lookup() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .route("esearch.fcgi", Reply::json(200, fixtures::esearch_response(&["2226", "9999"])))
                .route("esummary.fcgi", Reply::json(200, fixtures::esummary_response("2226"))),
        );
        let result = client(transport.clone()).annotate("rs238242").await;
        assert!(result.success, "{:?}", result.error);
        assert_eq!(result.data["uid"], json!("2226"));

        let calls = transport.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].url, "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/esearch.fcgi");
        assert_eq!(calls[0].param("db"), Some("clinvar"));
        assert_eq!(calls[0].param("term"), Some("rs238242"));
        assert_eq!(calls[0].param("retmode"), Some("json"));
        assert_eq!(calls[0].param("retmax"), Some("5"));
        assert_eq!(calls[1].url, "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/esummary.fcgi");
        assert_eq!(calls[1].param("id"), Some("2226"));
    }

    #[tokio::test]
    async fn test_empty_search_skips_summary() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .route("esearch.fcgi", Reply::json(200, fixtures::esearch_response(&[])))
                .route("esummary.fcgi", Reply::json(200, fixtures::esummary_response("1"))),
        );
        let result = client(transport.clone()).annotate("rs12345").await;
        assert!(!result.success);
        assert!(result.data.is_empty());
        assert!(result.error.unwrap().starts_with("not found"));
        assert_eq!(transport.call_count("esearch.fcgi"), 1);
        assert_eq!(transport.call_count("esummary.fcgi"), 0);
    }

    #[tokio::test]
    async fn test_search_failure_skips_summary() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .route("esearch.fcgi", Reply::status(500, "internal"))
                .route("esummary.fcgi", Reply::json(200, fixtures::esummary_response("1"))),
        );
        let result = client(transport.clone()).annotate("rs1").await;
        assert!(!result.success);
        assert!(result.error.unwrap().contains("500"));
        assert_eq!(transport.call_count("esummary.fcgi"), 0);
    }

    #[tokio::test]
    async fn test_summary_failure_reported() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .route("esearch.fcgi", Reply::json(200, fixtures::esearch_response(&["7"])))
                .route("esummary.fcgi", Reply::transport_error("connection refused")),
        );
        let result = client(transport).annotate("rs1").await;
        assert!(!result.success);
        assert!(result.data.is_empty());
        assert!(result.error.unwrap().contains("connection refused"));
    }

    #[tokio::test]
    async fn test_summary_without_record_is_empty() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .route("esearch.fcgi", Reply::json(200, fixtures::esearch_response(&["7"])))
                .route("esummary.fcgi", Reply::json(200, json!({"result": {"uids": []}}))),
        );
        let result = client(transport).annotate("rs1").await;
        assert!(!result.success);
        assert!(result.error.unwrap().contains("no data found"));
    }
}
