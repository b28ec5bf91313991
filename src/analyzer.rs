//! The report analyzer: construct, parse once, then read-only queries.

use std::path::Path;

use crate::clash::{ClashAccumulator, ClashPair};
use crate::classifier::{self, CategoryStore};
use crate::config::AnalyzerOptions;
use crate::error::Result;
use crate::loader;
use crate::metrics;
use crate::record::{OutlierCategory, OutlierRecord};
use crate::shifts::{self, ChemicalShiftStatistics, ReferencingOffset, ShiftData, ShiftOutlier, UnmappedShift};

const NO_RECORDS: &[OutlierRecord] = &[];

/// Parses a structural-model validation report once at construction and
/// exposes the derived collections through pure accessors.
///
/// Control flow is strictly linear: construct, walk the tree, populate the
/// internal stores, then answer queries from memory. Nothing is re-parsed
/// or mutated after construction, so independent instances can be built and
/// queried concurrently without synchronization.
#[derive(Debug)]
pub struct ReportAnalyzer {
    outliers: CategoryStore,
    clash_pairs: Vec<ClashPair>,
    completeness: String,
    shifts: ShiftData,
}

impl ReportAnalyzer {
    /// Load and analyze a report file with default thresholds.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_path_with_options(path, AnalyzerOptions::default())
    }

    /// Load and analyze a report file with explicit thresholds.
    pub fn from_path_with_options(
        path: impl AsRef<Path>,
        options: AnalyzerOptions,
    ) -> Result<Self> {
        let text = loader::read_report(path.as_ref())?;
        Self::from_str_with_options(&text, options)
    }

    /// Analyze a report already held in memory with default thresholds.
    pub fn from_str(xml: &str) -> Result<Self> {
        Self::from_str_with_options(xml, AnalyzerOptions::default())
    }

    /// Analyze a report already held in memory with explicit thresholds.
    ///
    /// Fails on malformed XML and on non-numeric values in any threshold
    /// test; either error leaves no analyzer behind.
    pub fn from_str_with_options(xml: &str, options: AnalyzerOptions) -> Result<Self> {
        let doc = loader::parse_report(xml)?;

        let mut outliers = CategoryStore::new();
        let globals = metrics::extract_entry(&doc, &options)?;
        for (category, record) in globals.records {
            outliers.entry(category).or_default().push(record);
        }

        let mut clashes = ClashAccumulator::default();
        classifier::classify_residues(&doc, &options, &mut outliers, &mut clashes)?;

        let mut shift_data = ShiftData::default();
        shifts::process_shift_lists(&doc, &mut shift_data)?;

        Ok(Self {
            outliers,
            clash_pairs: clashes.resolve(),
            completeness: globals.completeness,
            shifts: shift_data,
        })
    }

    /// Records for one outlier category, in document order. Categories the
    /// document never produced yield an empty slice.
    pub fn outliers(&self, category: OutlierCategory) -> &[OutlierRecord] {
        self.outliers
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(NO_RECORDS)
    }

    /// String-keyed variant of [`outliers`](Self::outliers); unknown
    /// category names yield an empty slice.
    pub fn outliers_by_name(&self, name: &str) -> &[OutlierRecord] {
        OutlierCategory::from_name(name)
            .map(|category| self.outliers(category))
            .unwrap_or(NO_RECORDS)
    }

    /// Resolved atomic clash pairs.
    pub fn clash_outliers(&self) -> &[ClashPair] {
        &self.clash_pairs
    }

    /// The entry's calculated data completeness; empty when the report does
    /// not provide one.
    pub fn calculated_completeness(&self) -> &str {
        &self.completeness
    }

    /// Aggregated chemical shift counts summed over every shift list.
    pub fn chemical_shift_statistics(&self) -> ChemicalShiftStatistics {
        self.shifts.statistics
    }

    /// Number of errors raised while mapping shifts onto the structure.
    pub fn cs_mapping_error_count(&self) -> u64 {
        self.shifts.statistics.mapping_errors
    }

    /// Number of warnings raised while mapping shifts onto the structure.
    pub fn cs_mapping_warning_count(&self) -> u64 {
        self.shifts.statistics.mapping_warnings
    }

    /// Shifts that could not be mapped onto the structure.
    pub fn unmapped_shifts(&self) -> &[UnmappedShift] {
        &self.shifts.unmapped
    }

    /// The subset of unmapped shifts whose residue is absent from the
    /// structure entirely.
    pub fn unmapped_residue_shifts(&self) -> &[UnmappedShift] {
        &self.shifts.unmapped_residues
    }

    /// Chemical shift outliers against predicted values.
    pub fn shift_outliers(&self) -> &[ShiftOutlier] {
        &self.shifts.outliers
    }

    /// Detected referencing offsets, one per atom type per shift list.
    pub fn referencing_offsets(&self) -> &[ReferencingOffset] {
        &self.shifts.offsets
    }

    /// True when at least one referencing offset is significant
    /// (`|value| >= uncertainty`, all of precision/uncertainty/value given).
    pub fn referencing_offset_flag(&self) -> bool {
        self.shifts.offset_flag
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_category_name_yields_empty() {
        let analyzer = ReportAnalyzer::from_str("<Entry/>").unwrap();
        assert!(analyzer.outliers_by_name("no-such-category").is_empty());
        assert!(analyzer.outliers_by_name("bond-outlier").is_empty());
    }

    #[test]
    fn test_empty_report_defaults() {
        let analyzer = ReportAnalyzer::from_str("<Entry/>").unwrap();
        assert_eq!(analyzer.calculated_completeness(), "");
        assert!(analyzer.clash_outliers().is_empty());
        assert_eq!(analyzer.chemical_shift_statistics().as_tuple(), (0, 0, 0, 0, 0, 0));
        assert!(!analyzer.referencing_offset_flag());
    }

    #[test]
    fn test_custom_options_shift_thresholds() {
        let xml = r#"<r><Entry/><ModelledSubgroup chain="A" rsrz="4.5"/></r>"#;
        let strict = AnalyzerOptions {
            rsrz_cutoff: 4.0,
            ..AnalyzerOptions::default()
        };

        let default_analyzer = ReportAnalyzer::from_str(xml).unwrap();
        assert!(default_analyzer.outliers(OutlierCategory::PolymerRsrz).is_empty());

        let strict_analyzer = ReportAnalyzer::from_str_with_options(xml, strict).unwrap();
        assert_eq!(strict_analyzer.outliers(OutlierCategory::PolymerRsrz).len(), 1);
    }
}
