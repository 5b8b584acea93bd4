//! genannot-common: Shared types, errors, configuration and the
//! rate-limited HTTP client used by every annotation source.

pub mod error;
pub mod models;
pub mod config;
pub mod http;
pub mod weights;

// Re-export commonly used types
pub use config::{AnnotatorConfig, ConservationTrack, ExecutionConfig, HttpConfig, SourcesConfig};
pub use error::{AnnotatorError, FetchError, Result};
pub use http::{FetchOutcome, HttpResponse, HttpTransport, RateLimitedClient, ReqwestTransport};
pub use models::{AnnotationResult, AnnotationSet, GenomicPosition, GenomicRegion};
pub use weights::ScoreWeights;
