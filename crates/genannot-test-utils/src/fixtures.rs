//! Canned upstream payloads, trimmed from real responses.

use serde_json::{json, Value};

/// MyVariant record with every scored field populated.
pub fn myvariant_record() -> Value {
    json!({
        "_id": "chr3:g.10191649C>T",
        "_version": 2,
        "cadd": {"_license": "http://bit.ly/2TIuab9", "phred": 27.3},
        "clinvar": {
            "rcv": [
                {"accession": "RCV000001", "clinical_significance": "Uncertain significance"},
                {"accession": "RCV000002", "clinical_significance": "Pathogenic"}
            ],
            "variant_id": 2226
        },
        "gnomad_exome": {"af": {"af": 0.0}},
        "gnomad_genome": {"af": 0.00003}
    })
}

/// MyVariant answer for an id it knows nothing about beyond the key.
pub fn myvariant_metadata_only() -> Value {
    json!({"_id": "rs12345", "_version": 1})
}

/// VEP returns a list with one consequence record per input.
pub fn vep_response() -> Value {
    json!([{
        "id": "rs238242",
        "most_severe_consequence": "missense_variant",
        "seq_region_name": "3",
        "start": 10191649,
        "transcript_consequences": [
            {"gene_symbol": "VHL", "impact": "MODERATE", "consequence_terms": ["missense_variant"]}
        ]
    }])
}

pub fn esearch_response(ids: &[&str]) -> Value {
    json!({
        "header": {"type": "esearch", "version": "0.3"},
        "esearchresult": {
            "count": ids.len().to_string(),
            "retmax": ids.len().to_string(),
            "idlist": ids
        }
    })
}

pub fn esummary_response(id: &str) -> Value {
    let mut result = json!({"uids": [id]});
    result[id] = json!({
        "uid": id,
        "title": "NM_000551.4(VHL):c.194C>T (p.Ser65Leu)",
        "germline_classification": {"description": "Pathogenic"}
    });
    json!({
        "header": {"type": "esummary", "version": "0.3"},
        "result": result
    })
}

pub fn ucsc_track_response(track: &str, chrom: &str, start: u64, end: u64) -> Value {
    let mut body = json!({
        "downloadTime": "2024:01:01T00:00:00Z",
        "genome": "hg38",
        "track": track,
        "chrom": chrom,
        "start": start,
        "end": end
    });
    body[track] = json!([{"start": start, "end": end, "value": 4.12}]);
    body
}
