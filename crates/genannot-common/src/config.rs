//! Annotator configuration.
//!
//! Every field has a default, so an empty file (or no file at all) yields a
//! working setup against the public endpoints. The binary decides where the
//! file comes from; this module only knows how to parse and validate it.

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::AnnotatorError;
use crate::weights::ScoreWeights;

/// Complete annotator configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnnotatorConfig {
    /// Outbound request pacing and timeouts
    #[serde(default)]
    pub http: HttpConfig,

    /// Endpoints and per-source options
    #[serde(default)]
    pub sources: SourcesConfig,

    /// Batch execution options
    #[serde(default)]
    pub execution: ExecutionConfig,

    /// Impact score weights and allele-frequency thresholds
    #[serde(default)]
    pub scoring: ScoreWeights,
}

// ── HTTP ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Minimum spacing between two requests issued by the same source
    #[serde(default = "default_min_interval_ms")]
    pub min_interval_ms: u64,

    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_min_interval_ms() -> u64 { 600 }
fn default_timeout_secs() -> u64 { 30 }
fn default_user_agent() -> String { "GenomicAnnotator/1.0".to_string() }

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            min_interval_ms: default_min_interval_ms(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl HttpConfig {
    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// ── Sources ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    #[serde(default = "default_myvariant_url")]
    pub myvariant_url: String,

    /// Comma-separated field selection sent to MyVariant
    #[serde(default = "default_myvariant_fields")]
    pub myvariant_fields: String,

    #[serde(default = "default_ensembl_url")]
    pub ensembl_url: String,

    #[serde(default = "default_eutils_url")]
    pub eutils_url: String,

    #[serde(default = "default_ucsc_url")]
    pub ucsc_url: String,

    /// Genome assembly for UCSC track lookups
    #[serde(default = "default_genome")]
    pub genome: String,

    /// One position annotator is registered per track
    #[serde(default = "default_tracks")]
    pub conservation_tracks: Vec<ConservationTrack>,
}

/// A named UCSC track, e.g. `phylop` → `phyloP100way`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConservationTrack {
    pub name: String,
    pub track: String,
}

fn default_myvariant_url() -> String { "https://myvariant.info/v1".to_string() }
fn default_myvariant_fields() -> String {
    "cadd.phred,clinvar,dbnsfp,gnomad_exome.af,gnomad_genome.af".to_string()
}
fn default_ensembl_url() -> String { "https://rest.ensembl.org".to_string() }
fn default_eutils_url() -> String { "https://eutils.ncbi.nlm.nih.gov/entrez/eutils".to_string() }
fn default_ucsc_url() -> String { "https://api.genome.ucsc.edu".to_string() }
fn default_genome() -> String { "hg38".to_string() }
fn default_tracks() -> Vec<ConservationTrack> {
    vec![
        ConservationTrack { name: "phylop".to_string(), track: "phyloP100way".to_string() },
        ConservationTrack { name: "phastcons".to_string(), track: "phastCons100way".to_string() },
    ]
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            myvariant_url: default_myvariant_url(),
            myvariant_fields: default_myvariant_fields(),
            ensembl_url: default_ensembl_url(),
            eutils_url: default_eutils_url(),
            ucsc_url: default_ucsc_url(),
            genome: default_genome(),
            conservation_tracks: default_tracks(),
        }
    }
}

// ── Execution ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Maximum number of variants annotated at once in batch mode
    #[serde(default = "default_max_concurrent_variants")]
    pub max_concurrent_variants: usize,
}

fn default_max_concurrent_variants() -> usize { 4 }

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self { max_concurrent_variants: default_max_concurrent_variants() }
    }
}

// ── Loading ──────────────────────────────────────────────────────────────────

impl AnnotatorConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, AnnotatorError> {
        toml::from_str(content).map_err(|e| AnnotatorError::Config(e.to_string()))
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, AnnotatorError> {
        serde_yaml::from_str(content).map_err(|e| AnnotatorError::Config(e.to_string()))
    }

    /// Load from a `.toml`, `.yaml` or `.yml` file and validate it.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, AnnotatorError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| AnnotatorError::Config(format!("cannot read {}: {e}", path.display())))?;

        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content)?,
            _ => Self::from_toml_str(&content)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AnnotatorError> {
        let s = &self.sources;
        for (label, base) in [
            ("myvariant_url", &s.myvariant_url),
            ("ensembl_url", &s.ensembl_url),
            ("eutils_url", &s.eutils_url),
            ("ucsc_url", &s.ucsc_url),
        ] {
            Url::parse(base)
                .map_err(|e| AnnotatorError::Config(format!("sources.{label} `{base}`: {e}")))?;
        }

        if self.http.timeout_secs == 0 {
            return Err(AnnotatorError::Config("http.timeout_secs must be positive".into()));
        }
        if self.execution.max_concurrent_variants == 0 {
            return Err(AnnotatorError::Config(
                "execution.max_concurrent_variants must be at least 1".into(),
            ));
        }

        self.scoring.validate()?;

        let mut seen = HashSet::new();
        for t in &s.conservation_tracks {
            if !seen.insert(t.name.as_str()) {
                return Err(AnnotatorError::Config(format!(
                    "duplicate conservation track name `{}`",
                    t.name
                )));
            }
        }
        Ok(())
    }
}
