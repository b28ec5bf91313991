//! Chemical shift aggregation across one or more `chemical_shift_list`
//! elements (one per uploaded shift set).

use roxmltree::{Document, Node};
use serde::Serialize;

use crate::error::{AnalyzerError, Result};

/// Diagnostic prefix marking a shift whose residue is absent from the model.
const RESIDUE_NOT_FOUND: &str = "Residue not found in structure.";

/// Running totals summed over every shift list in the document, plus the
/// count of per-shift outlier records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ChemicalShiftStatistics {
    pub total: u64,
    pub mapped: u64,
    pub unparsed: u64,
    pub mapping_errors: u64,
    pub mapping_warnings: u64,
    pub outliers: u64,
}

impl ChemicalShiftStatistics {
    /// Positional form `(total, mapped, unparsed, errors, warnings,
    /// outlier_count)` for consumers that index rather than name fields.
    pub fn as_tuple(&self) -> (u64, u64, u64, u64, u64, u64) {
        (
            self.total,
            self.mapped,
            self.unparsed,
            self.mapping_errors,
            self.mapping_warnings,
            self.outliers,
        )
    }
}

/// A shift that could not be mapped onto the structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnmappedShift {
    pub chain: String,
    pub resnum: String,
    pub rescode: String,
    pub atom: String,
    pub value: String,
    pub error: String,
    pub ambiguity: String,
}

/// A shift flagged as a statistical outlier against prediction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShiftOutlier {
    pub chain: String,
    pub resnum: String,
    pub rescode: String,
    pub atom: String,
    pub value: String,
    pub prediction: String,
    pub zscore: String,
}

/// A systematic referencing offset detected for one atom type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferencingOffset {
    pub atom: String,
    pub number_of_measurements: String,
    pub precision: String,
    pub uncertainty: String,
    pub value: String,
}

/// Everything derived from the document's shift lists.
#[derive(Debug, Default)]
pub(crate) struct ShiftData {
    pub statistics: ChemicalShiftStatistics,
    pub unmapped: Vec<UnmappedShift>,
    pub unmapped_residues: Vec<UnmappedShift>,
    pub outliers: Vec<ShiftOutlier>,
    pub offsets: Vec<ReferencingOffset>,
    /// Sticky: once any offset record trips it, it stays set.
    pub offset_flag: bool,
}

pub(crate) fn process_shift_lists(doc: &Document, data: &mut ShiftData) -> Result<()> {
    for list in doc
        .descendants()
        .filter(|n| n.has_tag_name("chemical_shift_list"))
    {
        process_list(&list, data)?;
    }
    data.statistics.outliers = data.outliers.len() as u64;
    Ok(())
}

fn process_list(list: &Node, data: &mut ShiftData) -> Result<()> {
    let stats = &mut data.statistics;
    stats.total += count_attribute(list, "total_number_of_shifts")?;
    stats.mapped += count_attribute(list, "number_of_mapped_shifts")?;
    stats.unparsed += count_attribute(list, "number_of_unparsed_shifts")?;
    stats.mapping_errors += count_attribute(list, "number_of_errors_while_mapping")?;
    stats.mapping_warnings += count_attribute(list, "number_of_warnings_while_mapping")?;

    for child in list.children().filter(|n| n.is_element()) {
        let attr = |name| child.attribute(name).unwrap_or("").to_string();
        match child.tag_name().name() {
            "unmapped_chemical_shift" => {
                let shift = UnmappedShift {
                    chain: attr("chain"),
                    resnum: attr("resnum"),
                    rescode: attr("rescode"),
                    atom: attr("atom"),
                    value: attr("value"),
                    error: attr("error"),
                    ambiguity: attr("ambiguity"),
                };
                if child
                    .attribute("diagnostic")
                    .is_some_and(|d| d.starts_with(RESIDUE_NOT_FOUND))
                {
                    data.unmapped_residues.push(shift.clone());
                }
                data.unmapped.push(shift);
            }
            "chemical_shift_outlier" => {
                data.outliers.push(ShiftOutlier {
                    chain: attr("chain"),
                    resnum: attr("resnum"),
                    rescode: attr("rescode"),
                    atom: attr("atom"),
                    value: attr("value"),
                    prediction: attr("prediction"),
                    zscore: attr("zscore"),
                });
            }
            "referencing_offset" => {
                let offset = ReferencingOffset {
                    atom: attr("atom"),
                    number_of_measurements: attr("number_of_measurements"),
                    precision: attr("precision"),
                    uncertainty: attr("uncertainty"),
                    value: attr("value"),
                };
                data.offset_flag |= offset_significant(&offset)?;
                data.offsets.push(offset);
            }
            _ => {}
        }
    }
    Ok(())
}

/// An offset is significant when precision, uncertainty, and value are all
/// present and `|value| >= uncertainty`.
fn offset_significant(offset: &ReferencingOffset) -> Result<bool> {
    if offset.precision.is_empty() || offset.uncertainty.is_empty() || offset.value.is_empty() {
        return Ok(false);
    }
    let uncertainty: f64 = offset.uncertainty.parse().map_err(|_| {
        AnalyzerError::numeric("referencing_offset", "uncertainty", &offset.uncertainty)
    })?;
    let value: f64 = offset
        .value
        .parse()
        .map_err(|_| AnalyzerError::numeric("referencing_offset", "value", &offset.value))?;
    Ok(value.abs() >= uncertainty)
}

/// Aggregate count attribute: missing or empty reads as zero.
fn count_attribute(list: &Node, name: &str) -> Result<u64> {
    match list.attribute(name) {
        None | Some("") => Ok(0),
        Some(value) => value
            .parse()
            .map_err(|_| AnalyzerError::numeric("chemical_shift_list", name, value)),
    }
}
