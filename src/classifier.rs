//! Residue outlier classification.
//!
//! Walks every `ModelledSubgroup` element in document order and routes the
//! signal it carries (node attributes and child elements) into the category
//! registry, attaching the residue's identity to each emitted record. Clash
//! children route to the [`ClashAccumulator`] instead of a category list.

use std::collections::HashMap;

use roxmltree::{Document, Node};

use crate::clash::ClashAccumulator;
use crate::config::AnalyzerOptions;
use crate::error::{AnalyzerError, Result};
use crate::record::{CHILD_RULES, ChildFilter, OutlierCategory, OutlierRecord, ResidueContext};

/// Per-category record lists, insertion order = document order.
pub(crate) type CategoryStore = HashMap<OutlierCategory, Vec<OutlierRecord>>;

pub(crate) fn classify_residues(
    doc: &Document,
    options: &AnalyzerOptions,
    outliers: &mut CategoryStore,
    clashes: &mut ClashAccumulator,
) -> Result<()> {
    for residue in doc
        .descendants()
        .filter(|n| n.has_tag_name("ModelledSubgroup"))
    {
        classify_residue(&residue, options, outliers, clashes)?;
    }
    Ok(())
}

fn classify_residue(
    residue: &Node,
    options: &AnalyzerOptions,
    outliers: &mut CategoryStore,
    clashes: &mut ClashAccumulator,
) -> Result<()> {
    // Residue identity is read at most once, on the first emitted record.
    let mut identity: Option<ResidueContext> = None;

    // Node-attribute categories run before child elements so per-category
    // ordering stays stable.
    if residue.attribute("rama") == Some("OUTLIER") {
        emit(
            outliers,
            &mut identity,
            residue,
            OutlierCategory::Torsion,
            residue,
            &["phi", "psi"],
        );
    }
    if rsrz_exceeds(residue, "rsrz", options.rsrz_cutoff)? {
        emit(
            outliers,
            &mut identity,
            residue,
            OutlierCategory::PolymerRsrz,
            residue,
            &["rsrz"],
        );
    }
    if rsrz_exceeds(residue, "ligRSRZ", options.rsrz_cutoff)? {
        emit(
            outliers,
            &mut identity,
            residue,
            OutlierCategory::LigandRsrz,
            residue,
            &["ligRSRZ"],
        );
    }

    for child in residue.children().filter(|n| n.is_element()) {
        let tag = child.tag_name().name();
        if tag == "clash" {
            clashes.observe(residue, &child, options.clash_distance_cutoff)?;
            continue;
        }
        let Some(rule) = CHILD_RULES.iter().find(|r| r.category.name() == tag) else {
            continue;
        };
        if !passes_filter(&child, rule.filter, options)? {
            continue;
        }
        emit(
            outliers,
            &mut identity,
            residue,
            rule.category,
            &child,
            rule.schema,
        );
    }
    Ok(())
}

/// True when the attribute is present and strictly above the cutoff. A
/// non-numeric value aborts the analysis rather than being skipped.
fn rsrz_exceeds(residue: &Node, attribute: &str, cutoff: f64) -> Result<bool> {
    let Some(value) = residue.attribute(attribute) else {
        return Ok(false);
    };
    let parsed: f64 = value
        .parse()
        .map_err(|_| AnalyzerError::numeric("ModelledSubgroup", attribute, value))?;
    Ok(parsed > cutoff)
}

fn passes_filter(child: &Node, filter: ChildFilter, options: &AnalyzerOptions) -> Result<bool> {
    match filter {
        ChildFilter::Always => Ok(true),
        ChildFilter::BackboneLinkage => {
            let atom0 = child.attribute("atom0").unwrap_or("");
            let atom1 = child.attribute("atom1").unwrap_or("");
            Ok(!(matches!(atom0, "C" | "O3'") && matches!(atom1, "N" | "P")))
        }
        ChildFilter::MogZscore => {
            let value = child.attribute("Zscore").unwrap_or("");
            let zscore: f64 = value.parse().map_err(|_| {
                AnalyzerError::numeric(child.tag_name().name(), "Zscore", value)
            })?;
            Ok(zscore.abs() > options.mog_zscore_cutoff)
        }
    }
}

/// Append one record: residue identity fields first, then the category
/// schema read off the producing node.
fn emit(
    outliers: &mut CategoryStore,
    identity: &mut Option<ResidueContext>,
    residue: &Node,
    category: OutlierCategory,
    source: &Node,
    schema: &[&'static str],
) {
    let context = identity.get_or_insert_with(|| ResidueContext::from_node(residue));
    let mut record = OutlierRecord::with_capacity(6 + schema.len());
    for (name, value) in context.fields() {
        record.push(name, value.to_string());
    }
    for &name in schema {
        record.push(name, source.attribute(name).unwrap_or("").to_string());
    }
    outliers.entry(category).or_default().push(record);
}
