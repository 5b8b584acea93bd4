//! Composite variant impact score.
//!
//! Only the MyVariant envelope feeds the score today. Three terms are summed:
//!
//! 1. severity: `min(cadd.phred / 30, 0.4)` for a positive CADD phred
//! 2. clinical significance: `+0.4` if any ClinVar RCV record is pathogenic
//! 3. rarity: tiered bonus from the first gnomAD source with an AF value
//!
//! and the sum is clamped to `[0, 1]`. A missing or failed MyVariant
//! envelope scores 0 with no details.

use std::collections::BTreeMap;

use genannot_common::{AnnotationResult, AnnotationSet, ScoreWeights};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::normalise::{coerce_f64, object_field};

/// Registry name of the only source that currently contributes.
pub const SCORED_SOURCE: &str = "myvariant";

/// Population-frequency sources, in priority order.
pub const FREQUENCY_SOURCES: [&str; 2] = ["gnomad_exome", "gnomad_genome"];

/// One entry of the score breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScoreDetail {
    Flag(bool),
    Measurement(f64),
}

impl ScoreDetail {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ScoreDetail::Measurement(v) => Some(*v),
            ScoreDetail::Flag(_) => None,
        }
    }
}

impl std::fmt::Display for ScoreDetail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoreDetail::Flag(b) => write!(f, "{b}"),
            ScoreDetail::Measurement(v) => write!(f, "{v:.3}"),
        }
    }
}

/// Score plus the provenance of every contribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Always within `[0.0, 1.0]`
    pub total: f64,
    pub details: BTreeMap<String, ScoreDetail>,
}

impl ScoreResult {
    pub fn zero() -> Self {
        Self { total: 0.0, details: BTreeMap::new() }
    }

    pub fn tier(&self) -> ImpactTier {
        ImpactTier::from_score(self.total)
    }
}

#[derive(Debug, Clone, Default)]
pub struct VariantScorer {
    weights: ScoreWeights,
}

impl VariantScorer {
    pub fn new(weights: ScoreWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    /// Score a result set. Pure and deterministic; never fails.
    pub fn score(&self, results: &AnnotationSet) -> ScoreResult {
        match results.get(SCORED_SOURCE) {
            Some(AnnotationResult { success: true, data, .. }) => self.score_myvariant(data),
            _ => ScoreResult::zero(),
        }
    }

    fn score_myvariant(&self, data: &Map<String, Value>) -> ScoreResult {
        let mut details = BTreeMap::new();
        let mut score = 0.0;

        // Severity
        if let Some(phred) = object_field(data.get("cadd"), "phred").and_then(coerce_f64) {
            if phred > 0.0 {
                details.insert("cadd_phred".to_string(), ScoreDetail::Measurement(phred));
                score += self.weights.cadd_contribution(phred);
            }
        }

        // Clinical significance: first pathogenic RCV wins
        if let Some(rcv) = object_field(data.get("clinvar"), "rcv").and_then(Value::as_array) {
            if rcv.iter().any(is_pathogenic_record) {
                details.insert("clinvar_pathogenic".to_string(), ScoreDetail::Flag(true));
                score += self.weights.pathogenic_bonus;
            }
        }

        // Rarity: first frequency source with a usable AF wins
        for db in FREQUENCY_SOURCES {
            if let Some(af) = object_field(data.get(db), "af").and_then(coerce_f64) {
                details.insert(format!("{db}_af"), ScoreDetail::Measurement(af));
                score += self.weights.rarity_bonus(af);
                break;
            }
        }

        details.insert("myvariant_score".to_string(), ScoreDetail::Measurement(score));
        let total = score.clamp(0.0, 1.0);
        debug!(total, raw = score, "Scored variant");

        ScoreResult { total, details }
    }
}

fn is_pathogenic_record(record: &Value) -> bool {
    let Some(obj) = record.as_object() else {
        return false;
    };
    let significance = match obj.get("clinical_significance") {
        Some(Value::String(s)) => s.to_lowercase(),
        Some(Value::Null) | None => return false,
        Some(other) => other.to_string().to_lowercase(),
    };
    significance.contains("pathogenic")
}

/// Qualitative reading of a composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactTier {
    High,
    Moderate,
    Low,
    Minimal,
}

impl ImpactTier {
    pub fn from_score(score: f64) -> Self {
        if score > 0.6 {
            ImpactTier::High
        } else if score > 0.3 {
            ImpactTier::Moderate
        } else if score > 0.1 {
            ImpactTier::Low
        } else {
            ImpactTier::Minimal
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ImpactTier::High => "HIGH",
            ImpactTier::Moderate => "MODERATE",
            ImpactTier::Low => "LOW",
            ImpactTier::Minimal => "MINIMAL",
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            ImpactTier::High => "HIGH IMPACT - Likely pathogenic",
            ImpactTier::Moderate => "MODERATE IMPACT - Possibly significant",
            ImpactTier::Low => "LOW IMPACT - Likely benign but notable",
            ImpactTier::Minimal => "MINIMAL IMPACT - Likely benign",
        }
    }
}
