//! UCSC Genome Browser conservation tracks (phyloP, phastCons, ...).
//!
//! Endpoint: {base}/getData/track?genome=hg38&track={track}&chrom={chrom}&start={pos-1}&end={pos}
//! One client per track; the source name is `ucsc_{track}`.

use std::sync::Arc;

use async_trait::async_trait;
use genannot_common::{
    AnnotationResult, AnnotatorError, FetchOutcome, GenomicPosition, HttpConfig, HttpTransport,
    RateLimitedClient, SourcesConfig,
};
use serde_json::{Map, Value};
use tracing::instrument;

use super::{endpoint, finish, into_record, PositionAnnotator};

pub struct ConservationClient {
    client: RateLimitedClient,
    name: String,
    base_url: String,
    genome: String,
    track: String,
}

impl ConservationClient {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        http: &HttpConfig,
        sources: &SourcesConfig,
        track: impl Into<String>,
    ) -> Self {
        let track = track.into();
        Self {
            client: RateLimitedClient::new(transport, http),
            name: format!("ucsc_{track}"),
            base_url: sources.ucsc_url.clone(),
            genome: sources.genome.clone(),
            track,
        }
    }

    #[instrument(skip(self), fields(track = %self.track))]
    async fn lookup(&self, position: &GenomicPosition) -> Result<Map<String, Value>, AnnotatorError> {
        let url = endpoint(&self.base_url, "getData/track");
        let (start, end) = position.ucsc_interval();
        let params = [
            ("genome", self.genome.clone()),
            ("track", self.track.clone()),
            ("chrom", position.chromosome.clone()),
            ("start", start.to_string()),
            ("end", end.to_string()),
        ];

        match self.client.fetch(&url, &params).await {
            FetchOutcome::Found(payload) => {
                let record = into_record(payload, &self.name)?;
                if record.is_empty() {
                    return Err(AnnotatorError::EmptyPayload(format!("no {} data", self.track)));
                }
                Ok(record)
            }
            FetchOutcome::NotFound => Err(AnnotatorError::NotFound(format!("{} at {}", self.track, position))),
            FetchOutcome::Failed(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl PositionAnnotator for ConservationClient {
    fn name(&self) -> &str {
        &self.name
    }

    async fn annotate(&self, position: &GenomicPosition) -> AnnotationResult {
        finish(&self.name, &position.to_hgvs(), self.lookup(position).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use genannot_common::AnnotatorConfig;
    use genannot_test_utils::{fixtures, Reply, ScriptedTransport};
    use serde_json::json;

    fn client(transport: Arc<ScriptedTransport>, track: &str) -> ConservationClient {
        let mut config = AnnotatorConfig::default();
        config.http.min_interval_ms = 0;
        ConservationClient::new(transport, &config.http, &config.sources, track)
    }

    #[tokio::test]
    async fn test_half_open_interval_request() {
        let transport = Arc::new(ScriptedTransport::new().route(
            "getData/track",
            Reply::json(200, fixtures::ucsc_track_response("phyloP100way", "chr1", 12344, 12345)),
        ));
        let pos = GenomicPosition::new("chr1", 12345).unwrap().with_alleles("A", "G");
        let result = client(transport.clone(), "phyloP100way").annotate(&pos).await;

        assert!(result.success);
        assert_eq!(result.source, "ucsc_phyloP100way");

        let calls = transport.calls();
        assert_eq!(calls[0].url, "https://api.genome.ucsc.edu/getData/track");
        assert_eq!(calls[0].param("genome"), Some("hg38"));
        assert_eq!(calls[0].param("track"), Some("phyloP100way"));
        assert_eq!(calls[0].param("chrom"), Some("chr1"));
        assert_eq!(calls[0].param("start"), Some("12344"));
        assert_eq!(calls[0].param("end"), Some("12345"));
    }

    #[tokio::test]
    async fn test_empty_payload_is_failure() {
        let transport = Arc::new(ScriptedTransport::new().route("getData/track", Reply::json(200, json!({}))));
        let pos = GenomicPosition::new("chr2", 67890).unwrap();
        let result = client(transport, "phastCons100way").annotate(&pos).await;
        assert!(!result.success);
        assert!(result.error.unwrap().contains("phastCons100way"));
    }

    #[tokio::test]
    async fn test_bad_request_is_failure() {
        let transport = Arc::new(
            ScriptedTransport::new().route("getData/track", Reply::status(400, r#"{"error":"bad chrom"}"#)),
        );
        let pos = GenomicPosition::new("chrZ", 1).unwrap();
        let result = client(transport, "phyloP100way").annotate(&pos).await;
        assert!(!result.success);
        assert!(result.data.is_empty());
        assert!(result.error.unwrap().contains("400"));
    }
}
