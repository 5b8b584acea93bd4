//! Core value types: genomic coordinates and the per-source result envelope.

use std::collections::BTreeMap;
use std::fmt::{self, Display};
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::AnnotatorError;

lazy_static! {
    // chr1:12345, chr1:12345:A>G
    static ref RE_COLON: Regex =
        Regex::new(r"^([^:\s]+):(\d+)(?::([ACGTNacgtn]+)>([ACGTNacgtn]+))?$").unwrap();
    // chr1:g.12345, chr1:g.12345A>G
    static ref RE_HGVS_G: Regex =
        Regex::new(r"^([^:\s]+):g\.(\d+)(?:([ACGTNacgtn]+)>([ACGTNacgtn]+))?$").unwrap();
}

// ── Coordinates ──────────────────────────────────────────────────────────────

/// A single 1-based genomic position with optional alleles.
///
/// Deserialization goes through [`GenomicPosition::new`], so a payload with
/// position 0 or an empty chromosome is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPosition")]
pub struct GenomicPosition {
    pub chromosome: String,
    pub position: u64,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub alternate: Option<String>,
}

#[derive(Deserialize)]
struct RawPosition {
    chromosome: String,
    position: u64,
    #[serde(default)]
    reference: Option<String>,
    #[serde(default)]
    alternate: Option<String>,
}

impl TryFrom<RawPosition> for GenomicPosition {
    type Error = AnnotatorError;

    fn try_from(raw: RawPosition) -> Result<Self, Self::Error> {
        let mut pos = GenomicPosition::new(raw.chromosome, raw.position)?;
        pos.reference = raw.reference.filter(|r| !r.is_empty());
        pos.alternate = raw.alternate.filter(|a| !a.is_empty());
        Ok(pos)
    }
}

impl GenomicPosition {
    pub fn new(chromosome: impl Into<String>, position: u64) -> Result<Self, AnnotatorError> {
        let chromosome = chromosome.into();
        if chromosome.trim().is_empty() {
            return Err(AnnotatorError::InvalidInput("chromosome must not be empty".into()));
        }
        if position == 0 {
            return Err(AnnotatorError::InvalidInput(
                "positions are 1-based; 0 is not a valid position".into(),
            ));
        }
        Ok(Self { chromosome, position, reference: None, alternate: None })
    }

    pub fn with_alleles(mut self, reference: impl Into<String>, alternate: impl Into<String>) -> Self {
        let (r, a) = (reference.into(), alternate.into());
        self.reference = (!r.is_empty()).then_some(r);
        self.alternate = (!a.is_empty()).then_some(a);
        self
    }

    /// `chrom:g.pos` or `chrom:g.posREF>ALT` when both alleles are known.
    pub fn to_hgvs(&self) -> String {
        match (&self.reference, &self.alternate) {
            (Some(r), Some(a)) => format!("{}:g.{}{}>{}", self.chromosome, self.position, r, a),
            _ => format!("{}:g.{}", self.chromosome, self.position),
        }
    }

    /// Half-open, 0-based interval covering this base: `(position - 1, position)`.
    pub fn ucsc_interval(&self) -> (u64, u64) {
        (self.position.saturating_sub(1), self.position)
    }
}

impl Display for GenomicPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hgvs())
    }
}

impl FromStr for GenomicPosition {
    type Err = AnnotatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let caps = RE_HGVS_G
            .captures(s)
            .or_else(|| RE_COLON.captures(s))
            .ok_or_else(|| AnnotatorError::InvalidInput(format!("unrecognised position: {s}")))?;

        let position: u64 = caps[2]
            .parse()
            .map_err(|_| AnnotatorError::InvalidInput(format!("position out of range: {}", &caps[2])))?;

        let mut pos = GenomicPosition::new(&caps[1], position)?;
        if let (Some(r), Some(a)) = (caps.get(3), caps.get(4)) {
            pos = pos.with_alleles(r.as_str().to_uppercase(), a.as_str().to_uppercase());
        }
        Ok(pos)
    }
}

/// A closed genomic interval.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawRegion")]
pub struct GenomicRegion {
    pub chromosome: String,
    pub start: u64,
    pub end: u64,
}

#[derive(Deserialize)]
struct RawRegion {
    chromosome: String,
    start: u64,
    end: u64,
}

impl TryFrom<RawRegion> for GenomicRegion {
    type Error = AnnotatorError;

    fn try_from(raw: RawRegion) -> Result<Self, Self::Error> {
        GenomicRegion::new(raw.chromosome, raw.start, raw.end)
    }
}

impl GenomicRegion {
    pub fn new(chromosome: impl Into<String>, start: u64, end: u64) -> Result<Self, AnnotatorError> {
        if start > end {
            return Err(AnnotatorError::InvalidInput(format!(
                "region start ({start}) is after end ({end})"
            )));
        }
        Ok(Self { chromosome: chromosome.into(), start, end })
    }

    pub fn width(&self) -> u64 {
        self.end - self.start
    }

    pub fn to_ucsc_format(&self) -> String {
        format!("{}:{}-{}", self.chromosome, self.start, self.end)
    }
}

impl Display for GenomicRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_ucsc_format())
    }
}

// ── Envelope ────────────────────────────────────────────────────────────────

/// Uniform per-source result. `data` is always present; it is empty on failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationResult {
    pub source: String,
    pub data: Map<String, Value>,
    pub success: bool,
    pub error: Option<String>,
}

impl AnnotationResult {
    pub fn success(source: impl Into<String>, data: Map<String, Value>) -> Self {
        Self { source: source.into(), data, success: true, error: None }
    }

    pub fn failure(source: impl Into<String>, error: impl Into<String>) -> Self {
        Self { source: source.into(), data: Map::new(), success: false, error: Some(error.into()) }
    }

    /// Fold an adapter lookup into an envelope.
    pub fn from_lookup(source: impl Into<String>, lookup: Result<Map<String, Value>, AnnotatorError>) -> Self {
        match lookup {
            Ok(data) => Self::success(source, data),
            Err(e) => Self::failure(source, e.to_string()),
        }
    }
}

/// Results of one annotate call, keyed by registry name.
pub type AnnotationSet = BTreeMap<String, AnnotationResult>;
