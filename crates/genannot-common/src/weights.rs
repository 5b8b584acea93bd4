//! Constants of the composite impact score.

use serde::{Deserialize, Serialize};

use crate::error::AnnotatorError;

/// Contribution caps, bonuses and thresholds of the composite impact score.
///
/// The default is the reference scoring scheme; a variant matching every
/// strong condition sums to exactly 1.0. Loaded from the `[scoring]` config
/// section, where any omitted key keeps its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    /// CADD phred value that maps linearly to 1.0 before capping
    pub cadd_divisor: f64,
    /// Upper bound of the CADD contribution
    pub cadd_cap: f64,
    /// Added once when any ClinVar RCV record is pathogenic
    pub pathogenic_bonus: f64,
    /// Allele frequency exactly zero
    pub af_absent_bonus: f64,
    /// 0 < AF < `ultra_rare_af`
    pub af_ultra_rare_bonus: f64,
    /// `ultra_rare_af` ≤ AF < `rare_af`
    pub af_rare_bonus: f64,
    pub ultra_rare_af: f64,
    pub rare_af: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            cadd_divisor:        30.0,
            cadd_cap:            0.4,
            pathogenic_bonus:    0.4,
            af_absent_bonus:     0.2,
            af_ultra_rare_bonus: 0.15,
            af_rare_bonus:       0.1,
            ultra_rare_af:       0.001,
            rare_af:             0.01,
        }
    }
}

impl ScoreWeights {
    pub fn validate(&self) -> Result<(), AnnotatorError> {
        if !(self.cadd_divisor.is_finite() && self.cadd_divisor > 0.0) {
            return Err(AnnotatorError::Config("scoring.cadd_divisor must be positive".into()));
        }
        for (label, v) in [
            ("cadd_cap", self.cadd_cap),
            ("pathogenic_bonus", self.pathogenic_bonus),
            ("af_absent_bonus", self.af_absent_bonus),
            ("af_ultra_rare_bonus", self.af_ultra_rare_bonus),
            ("af_rare_bonus", self.af_rare_bonus),
        ] {
            if !(v.is_finite() && v >= 0.0) {
                return Err(AnnotatorError::Config(format!("scoring.{label} must be a non-negative number")));
            }
        }
        if !(0.0 < self.ultra_rare_af && self.ultra_rare_af <= self.rare_af && self.rare_af <= 1.0) {
            return Err(AnnotatorError::Config(
                "scoring thresholds need 0 < ultra_rare_af <= rare_af <= 1".into(),
            ));
        }
        Ok(())
    }

    /// Largest raw sum these weights can produce.
    pub fn max_raw_score(&self) -> f64 {
        self.cadd_cap
            + self.pathogenic_bonus
            + self.af_absent_bonus.max(self.af_ultra_rare_bonus).max(self.af_rare_bonus)
    }

    /// Severity term: linear ramp, hard-capped.
    pub fn cadd_contribution(&self, phred: f64) -> f64 {
        (phred / self.cadd_divisor).min(self.cadd_cap)
    }

    /// Rarity term: tiered by allele frequency.
    pub fn rarity_bonus(&self, af: f64) -> f64 {
        if af == 0.0 {
            self.af_absent_bonus
        } else if af < self.ultra_rare_af {
            self.af_ultra_rare_bonus
        } else if af < self.rare_af {
            self.af_rare_bonus
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_max_is_one() {
        assert!((ScoreWeights::default().max_raw_score() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_cadd_cap() {
        let w = ScoreWeights::default();
        assert_eq!(w.cadd_contribution(40.0), 0.4);
        assert!((w.cadd_contribution(6.0) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_partial_table_keeps_defaults() {
        let w: ScoreWeights = toml::from_str("pathogenic_bonus = 0.5\n").unwrap();
        assert_eq!(w.pathogenic_bonus, 0.5);
        assert_eq!(w.cadd_divisor, 30.0);
        assert_eq!(w.rare_af, 0.01);
        assert!(w.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_weights() {
        assert!(ScoreWeights::default().validate().is_ok());
        let w = ScoreWeights { cadd_divisor: 0.0, ..ScoreWeights::default() };
        assert!(matches!(w.validate(), Err(AnnotatorError::Config(_))));
        let w = ScoreWeights { af_rare_bonus: -0.1, ..ScoreWeights::default() };
        assert!(w.validate().is_err());
        let w = ScoreWeights { ultra_rare_af: 0.05, rare_af: 0.01, ..ScoreWeights::default() };
        assert!(w.validate().is_err());
    }

    #[test]
    fn test_rarity_tiers() {
        let w = ScoreWeights::default();
        assert_eq!(w.rarity_bonus(0.0), 0.2);
        assert_eq!(w.rarity_bonus(0.0005), 0.15);
        assert_eq!(w.rarity_bonus(0.001), 0.1);
        assert_eq!(w.rarity_bonus(0.009), 0.1);
        assert_eq!(w.rarity_bonus(0.01), 0.0);
        assert_eq!(w.rarity_bonus(0.3), 0.0);
    }
}
