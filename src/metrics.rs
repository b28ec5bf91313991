//! Entry-level metrics: R/R-free agreement and data completeness.

use roxmltree::{Document, Node};

use crate::config::AnalyzerOptions;
use crate::error::{AnalyzerError, Result};
use crate::record::{OutlierCategory, OutlierRecord};

/// Attribute value meaning "absent" throughout the report.
pub(crate) const NOT_AVAILABLE: &str = "NotAvailable";

/// Derived whole-entry results.
#[derive(Debug, Default)]
pub(crate) struct GlobalMetrics {
    pub records: Vec<(OutlierCategory, OutlierRecord)>,
    pub completeness: String,
}

/// Extract global metrics from the first `Entry` element. A report without
/// an `Entry` yields no records and an empty completeness string.
pub(crate) fn extract_entry(doc: &Document, options: &AnalyzerOptions) -> Result<GlobalMetrics> {
    let mut metrics = GlobalMetrics::default();
    let Some(entry) = doc.descendants().find(|n| n.has_tag_name("Entry")) else {
        return Ok(metrics);
    };

    if let Some(record) = paired_metric(
        &entry,
        "DCC_Rfree",
        "PDB-Rfree",
        options.r_metric_tolerance,
    )? {
        metrics.records.push((OutlierCategory::RFreeDiff, record));
    }
    if let Some(record) = paired_metric(&entry, "DCC_R", "PDB-R", options.r_metric_tolerance)? {
        metrics.records.push((OutlierCategory::RWorkDiff, record));
    }

    metrics.completeness = entry
        .attribute("DataCompleteness")
        .filter(|v| *v != NOT_AVAILABLE)
        .unwrap_or("")
        .to_string();

    Ok(metrics)
}

/// Compare one attribute pair; emit a record only when both values are
/// available and their absolute difference exceeds the tolerance.
fn paired_metric(
    entry: &Node,
    first: &'static str,
    second: &'static str,
    tolerance: f64,
) -> Result<Option<OutlierRecord>> {
    let available = |name| entry.attribute(name).filter(|v| *v != NOT_AVAILABLE);
    let (Some(a), Some(b)) = (available(first), available(second)) else {
        return Ok(None);
    };

    let a_value: f64 = a
        .parse()
        .map_err(|_| AnalyzerError::numeric("Entry", first, a))?;
    let b_value: f64 = b
        .parse()
        .map_err(|_| AnalyzerError::numeric("Entry", second, b))?;

    let diff = (a_value - b_value).abs();
    if diff <= tolerance {
        return Ok(None);
    }

    let mut record = OutlierRecord::with_capacity(3);
    record.push("diff", format_metric(diff));
    record.push(first, a.to_string());
    record.push(second, b.to_string());
    Ok(Some(record))
}

/// Render a difference with at most four decimals and no trailing zeros, so
/// binary float noise (0.060000000000000005) does not leak into reports.
fn format_metric(value: f64) -> String {
    let mut text = format!("{:.4}", value);
    while text.ends_with('0') {
        text.pop();
    }
    if text.ends_with('.') {
        text.pop();
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::parse_report;

    fn extract(xml: &str) -> GlobalMetrics {
        let doc = parse_report(xml).unwrap();
        extract_entry(&doc, &AnalyzerOptions::default()).unwrap()
    }

    #[test]
    fn test_r_free_difference_flagged() {
        let metrics = extract(r#"<Entry DCC_Rfree="0.25" PDB-Rfree="0.19"/>"#);
        assert_eq!(metrics.records.len(), 1);

        let (category, record) = &metrics.records[0];
        assert_eq!(*category, OutlierCategory::RFreeDiff);
        assert_eq!(record.get("diff"), Some("0.06"));
        assert_eq!(record.get("DCC_Rfree"), Some("0.25"));
        assert_eq!(record.get("PDB-Rfree"), Some("0.19"));
    }

    #[test]
    fn test_difference_within_tolerance_ignored() {
        let metrics = extract(r#"<Entry DCC_R="0.20" PDB-R="0.24"/>"#);
        assert!(metrics.records.is_empty());
    }

    #[test]
    fn test_not_available_treated_as_absent() {
        let metrics = extract(r#"<Entry DCC_Rfree="NotAvailable" PDB-Rfree="0.19"/>"#);
        assert!(metrics.records.is_empty());
    }

    #[test]
    fn test_completeness_extraction() {
        assert_eq!(extract(r#"<Entry DataCompleteness="0.973"/>"#).completeness, "0.973");
        assert_eq!(extract(r#"<Entry DataCompleteness="NotAvailable"/>"#).completeness, "");
        assert_eq!(extract("<Entry/>").completeness, "");
    }

    #[test]
    fn test_non_numeric_pair_is_fatal() {
        let doc = parse_report(r#"<Entry DCC_R="abc" PDB-R="0.2"/>"#).unwrap();
        let err = extract_entry(&doc, &AnalyzerOptions::default()).unwrap_err();
        assert!(matches!(err, AnalyzerError::NumericAttribute { .. }));
    }

    #[test]
    fn test_format_metric_trims_noise() {
        assert_eq!(format_metric(0.060000000000000005), "0.06");
        assert_eq!(format_metric(0.1234), "0.1234");
        assert_eq!(format_metric(0.25), "0.25");
    }
}
