//! Human-readable output.

use std::fmt::Write;

use genannot_common::{AnnotationResult, AnnotationSet};
use genannot_scorer::{ImpactTier, ScoreResult};
use genannot_sources::VariantReport;
use serde_json::{Map, Value};

/// Fields shown per source before the rest is summarised.
pub const MAX_FIELDS: usize = 3;

/// Entries shown for a nested object.
const MAX_NESTED: usize = 2;

pub fn annotation_set(results: &AnnotationSet) -> String {
    let mut out = String::new();
    for (name, result) in results {
        out.push_str(&annotation(name, result));
    }
    out
}

pub fn annotation(name: &str, result: &AnnotationResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n{}:", name.to_uppercase());
    let _ = writeln!(out, "  Success: {}", result.success);

    if result.success && !result.data.is_empty() {
        for (key, value) in result.data.iter().take(MAX_FIELDS) {
            let _ = writeln!(out, "  {}: {}", key, field(value));
        }
        if result.data.len() > MAX_FIELDS {
            let _ = writeln!(out, "  ... and {} more fields", result.data.len() - MAX_FIELDS);
        }
    }
    if let Some(err) = &result.error {
        let _ = writeln!(out, "  Error: {}", err);
    }
    out
}

fn field(value: &Value) -> String {
    match value {
        Value::Object(map) => {
            let head: Map<String, Value> =
                map.iter().take(MAX_NESTED).map(|(k, v)| (k.clone(), v.clone())).collect();
            format!("{}...", Value::Object(head))
        }
        Value::Array(items) => format!("[{} items]", items.len()),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub fn score(score: &ScoreResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\nSCORE: {:.3}", score.total);
    let _ = writeln!(out, "INTERPRETATION: {}", score.tier().describe());
    if !score.details.is_empty() {
        let details: Vec<String> = score.details.iter().map(|(k, v)| format!("{k}={v}")).collect();
        let _ = writeln!(out, "DETAILS: {}", details.join(", "));
    }
    out
}

/// One line per batch row: id, score, tier, successful sources.
pub fn report_line(report: &VariantReport) -> String {
    let sources = if report.successful_sources.is_empty() {
        "-".to_string()
    } else {
        report.successful_sources.join(",")
    };
    format!(
        "{:<16} {:.3}  {:<8} {}",
        report.variant_id,
        report.total_score,
        ImpactTier::from_score(report.total_score).label(),
        sources
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use genannot_scorer::ScoreDetail;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn data(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn test_success_shows_first_fields() {
        let result = AnnotationResult::success(
            "myvariant",
            data(json!({
                "a_obj": {"x": 1, "y": 2, "z": 3},
                "b_list": [1, 2, 3, 4],
                "c_text": "hello",
                "d_more": 1,
                "e_more": 2
            })),
        );
        let text = annotation("myvariant", &result);
        assert_eq!(
            text,
            "\nMYVARIANT:\n  Success: true\n  a_obj: {\"x\":1,\"y\":2}...\n  b_list: [4 items]\n  c_text: hello\n  ... and 2 more fields\n"
        );
    }

    #[test]
    fn test_failure_shows_error() {
        let result = AnnotationResult::failure("clinvar", "not found: rs1 in ClinVar");
        let text = annotation("clinvar", &result);
        assert_eq!(text, "\nCLINVAR:\n  Success: false\n  Error: not found: rs1 in ClinVar\n");
    }

    #[test]
    fn test_score_block() {
        let mut details = BTreeMap::new();
        details.insert("cadd_phred".to_string(), ScoreDetail::Measurement(40.0));
        details.insert("clinvar_pathogenic".to_string(), ScoreDetail::Flag(true));
        let text = score(&ScoreResult { total: 0.8, details });
        assert!(text.contains("SCORE: 0.800"));
        assert!(text.contains("HIGH IMPACT"));
        assert!(text.contains("cadd_phred=40.000, clinvar_pathogenic=true"));
    }

    #[test]
    fn test_zero_score_has_no_details_line() {
        let text = score(&ScoreResult::zero());
        assert!(text.contains("MINIMAL IMPACT"));
        assert!(!text.contains("DETAILS"));
    }

    #[test]
    fn test_report_line() {
        let report = VariantReport {
            variant_id: "rs_bad".into(),
            successful_sources: vec![],
            total_score: 0.0,
            score_details: BTreeMap::new(),
            annotations: BTreeMap::new(),
        };
        let line = report_line(&report);
        assert!(line.starts_with("rs_bad"));
        assert!(line.contains("0.000"));
        assert!(line.contains("MINIMAL"));
        assert!(line.ends_with(" -"));
    }
}
