use thiserror::Error;

/// Failure of a single outbound request.
///
/// Produced by [`crate::http::RateLimitedClient`]; a 404 is not a failure
/// and never shows up here.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FetchError {
    #[error("request timed out after {0} ms")]
    Timeout(u64),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("upstream returned HTTP {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("could not decode response body: {0}")]
    Decode(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum AnnotatorError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("request failed: {0}")]
    Transport(String),

    #[error("upstream error (HTTP {status}): {body}")]
    Upstream { status: u16, body: String },

    #[error("no data found: {0}")]
    EmptyPayload(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<FetchError> for AnnotatorError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Upstream { status, body } => AnnotatorError::Upstream { status, body },
            other => AnnotatorError::Transport(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, AnnotatorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_keeps_status() {
        let err: AnnotatorError = FetchError::Upstream { status: 503, body: "busy".into() }.into();
        assert_eq!(err, AnnotatorError::Upstream { status: 503, body: "busy".into() });
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn test_timeout_collapses_to_transport() {
        let err: AnnotatorError = FetchError::Timeout(30_000).into();
        match err {
            AnnotatorError::Transport(msg) => assert!(msg.contains("timed out")),
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn test_not_found_message() {
        let err = AnnotatorError::NotFound("rs0 in ClinVar".into());
        assert!(err.to_string().starts_with("not found"));
    }
}
