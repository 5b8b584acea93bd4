//! Rate-limited outbound HTTP.
//!
//! Every source adapter owns one [`RateLimitedClient`]. The client keeps its
//! own "last request" clock, so pacing is per source: two adapters never wait
//! on each other. The wire I/O sits behind [`HttpTransport`] so the pacing,
//! timeout and status classification logic is the same in tests and in
//! production.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use serde_json::Value;
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::config::HttpConfig;
use crate::error::{AnnotatorError, FetchError};

/// Longest upstream error body kept in a [`FetchError::Upstream`].
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Raw status and body of one GET.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    pub fn json(status: u16, body: &Value) -> Self {
        Self { status, body: body.to_string() }
    }
}

/// Wire-level GET. Implementations report only transport problems as errors;
/// every HTTP status, including 4xx/5xx, comes back as an [`HttpResponse`].
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get(&self, url: &str, params: &[(&str, String)]) -> Result<HttpResponse, FetchError>;
}

// ── reqwest transport ────────────────────────────────────────────────────────

/// Production transport backed by a pooled `reqwest::Client`.
///
/// Cloning is cheap and shares the connection pool; it carries no pacing
/// state, so one instance can serve every adapter.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    timeout: Duration,
}

impl ReqwestTransport {
    pub fn new(config: &HttpConfig) -> Result<Self, AnnotatorError> {
        let client = ClientBuilder::new()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| AnnotatorError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, timeout: config.timeout() })
    }

    fn classify(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout(self.timeout.as_millis() as u64)
        } else if err.is_builder() {
            FetchError::InvalidRequest(err.to_string())
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str, params: &[(&str, String)]) -> Result<HttpResponse, FetchError> {
        let resp = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(|e| self.classify(e))?;
        Ok(HttpResponse { status, body })
    }
}

// ── Rate-limited client ──────────────────────────────────────────────────────

/// The three possible results of a fetch. Nothing else escapes the client.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Found(Value),
    NotFound,
    Failed(FetchError),
}

/// Turn a raw response into an outcome: 404 is `NotFound`, any other
/// non-2xx is `Upstream`, a 2xx body must be JSON.
pub fn classify_response(resp: HttpResponse) -> FetchOutcome {
    match resp.status {
        404 => FetchOutcome::NotFound,
        200..=299 => match serde_json::from_str::<Value>(&resp.body) {
            Ok(v) => FetchOutcome::Found(v),
            Err(e) => FetchOutcome::Failed(FetchError::Decode(e.to_string())),
        },
        status => FetchOutcome::Failed(FetchError::Upstream {
            status,
            body: resp.body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
        }),
    }
}

pub struct RateLimitedClient {
    transport: Arc<dyn HttpTransport>,
    min_interval: Duration,
    timeout: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl RateLimitedClient {
    pub fn new(transport: Arc<dyn HttpTransport>, config: &HttpConfig) -> Self {
        Self::with_limits(transport, config.min_interval(), config.timeout())
    }

    pub fn with_limits(transport: Arc<dyn HttpTransport>, min_interval: Duration, timeout: Duration) -> Self {
        Self {
            transport,
            min_interval,
            timeout,
            last_request: Mutex::new(None),
        }
    }

    /// Wait until `min_interval` has passed since the previous attempt, then
    /// stamp this one. The lock is held across the sleep so concurrent callers
    /// on the same client queue up instead of firing together.
    async fn pace(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < self.min_interval {
                sleep(self.min_interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }

    /// GET `url` with query `params`. Always returns one of the three outcomes.
    pub async fn fetch(&self, url: &str, params: &[(&str, String)]) -> FetchOutcome {
        self.pace().await;
        debug!(url, ?params, "outbound request");

        let outcome = match tokio::time::timeout(self.timeout, self.transport.get(url, params)).await {
            Err(_) => FetchOutcome::Failed(FetchError::Timeout(self.timeout.as_millis() as u64)),
            Ok(Err(e)) => FetchOutcome::Failed(e),
            Ok(Ok(resp)) => classify_response(resp),
        };

        if let FetchOutcome::Failed(ref e) = outcome {
            warn!(url, error = %e, "Request failed");
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedTransport {
        response: HttpResponse,
        delay: Duration,
        calls: AtomicUsize,
    }

    impl FixedTransport {
        fn new(response: HttpResponse) -> Self {
            Self { response, delay: Duration::ZERO, calls: AtomicUsize::new(0) }
        }
    }

    #[async_trait]
    impl HttpTransport for FixedTransport {
        async fn get(&self, _url: &str, _params: &[(&str, String)]) -> Result<HttpResponse, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                sleep(self.delay).await;
            }
            Ok(self.response.clone())
        }
    }

    fn client(transport: Arc<FixedTransport>, interval_ms: u64, timeout_ms: u64) -> RateLimitedClient {
        RateLimitedClient::with_limits(
            transport,
            Duration::from_millis(interval_ms),
            Duration::from_millis(timeout_ms),
        )
    }

    #[test]
    fn test_classify_statuses() {
        assert_eq!(classify_response(HttpResponse::new(404, "nope")), FetchOutcome::NotFound);
        assert_eq!(
            classify_response(HttpResponse::json(200, &json!({"a": 1}))),
            FetchOutcome::Found(json!({"a": 1}))
        );
        match classify_response(HttpResponse::new(500, "x".repeat(1000))) {
            FetchOutcome::Failed(FetchError::Upstream { status, body }) => {
                assert_eq!(status, 500);
                assert_eq!(body.len(), MAX_ERROR_BODY_CHARS);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(matches!(
            classify_response(HttpResponse::new(200, "<html>")),
            FetchOutcome::Failed(FetchError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn test_consecutive_fetches_are_spaced() {
        let transport = Arc::new(FixedTransport::new(HttpResponse::json(200, &json!({}))));
        let c = client(transport.clone(), 80, 1_000);

        let t0 = Instant::now();
        c.fetch("http://test/a", &[]).await;
        c.fetch("http://test/b", &[]).await;
        assert!(t0.elapsed() >= Duration::from_millis(75));
        assert_eq!(transport.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_slow_transport_times_out() {
        let mut fixed = FixedTransport::new(HttpResponse::json(200, &json!({})));
        fixed.delay = Duration::from_millis(500);
        let c = client(Arc::new(fixed), 0, 50);

        let t0 = Instant::now();
        let outcome = c.fetch("http://test/slow", &[]).await;
        assert_eq!(outcome, FetchOutcome::Failed(FetchError::Timeout(50)));
        assert!(t0.elapsed() < Duration::from_millis(400));
    }

    #[tokio::test]
    async fn test_failed_attempt_still_advances_clock() {
        let transport = Arc::new(FixedTransport::new(HttpResponse::new(503, "down")));
        let c = client(transport, 80, 1_000);

        let t0 = Instant::now();
        assert!(matches!(c.fetch("http://test/x", &[]).await, FetchOutcome::Failed(_)));
        assert!(matches!(c.fetch("http://test/x", &[]).await, FetchOutcome::Failed(_)));
        assert!(t0.elapsed() >= Duration::from_millis(75));
    }
}
