//! genannot-scorer: Composite variant impact scoring.
//! Pure functions over an [`genannot_common::AnnotationSet`]; no I/O.

pub mod scorer;
pub mod normalise;

pub use scorer::{ImpactTier, ScoreDetail, ScoreResult, VariantScorer};
pub use genannot_common::ScoreWeights;
