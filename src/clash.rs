//! Clash accumulation and pairwise resolution.
//!
//! Clash children are observed one atom at a time during residue traversal;
//! the source document ties the two atoms of one clash together with an
//! opaque contact id (`cid`). Resolution happens only after the whole
//! document has been walked.

use std::collections::BTreeMap;

use roxmltree::Node;
use serde::Serialize;

use crate::error::{AnalyzerError, Result};

/// One atom of a resolved clash, with the identity of its owning residue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClashSide {
    pub atom: String,
    pub chain: String,
    pub model: String,
    pub altcode: String,
    pub resnum: String,
    pub resname: String,
}

/// A validated bidirectional clash between two non-hydrogen atoms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClashPair {
    pub res1: ClashSide,
    pub res2: ClashSide,
    /// Observed inter-atomic distance, from the first observation.
    pub dist: String,
    /// Clash magnitude, from the first observation.
    pub clashmag: String,
}

/// Raw per-atom clash observation, pre-resolution.
#[derive(Debug, Clone)]
struct ClashObservation {
    side: ClashSide,
    dist: String,
    clashmag: String,
}

/// Accumulates clash observations keyed by contact id.
///
/// BTreeMap keys keep resolution order deterministic across analyzer
/// instances built from the same document.
#[derive(Debug, Default)]
pub(crate) struct ClashAccumulator {
    groups: BTreeMap<String, Vec<ClashObservation>>,
}

impl ClashAccumulator {
    /// Record one `clash` child of a residue node. Contacts at or beyond
    /// the distance cutoff are discarded before grouping; a non-numeric
    /// distance is fatal.
    pub fn observe(&mut self, residue: &Node, clash: &Node, max_dist: f64) -> Result<()> {
        let dist = clash.attribute("dist").unwrap_or("");
        let dist_value: f64 = dist
            .parse()
            .map_err(|_| AnalyzerError::numeric("clash", "dist", dist))?;
        if dist_value >= max_dist {
            return Ok(());
        }

        let clash_attr = |name| clash.attribute(name).unwrap_or("").to_string();
        let residue_attr = |name| residue.attribute(name).unwrap_or("").to_string();
        let observation = ClashObservation {
            side: ClashSide {
                atom: clash_attr("atom"),
                chain: residue_attr("chain"),
                model: residue_attr("model"),
                altcode: residue_attr("altcode"),
                resnum: residue_attr("resnum"),
                resname: residue_attr("resname"),
            },
            dist: dist.to_string(),
            clashmag: clash_attr("clashmag"),
        };

        self.groups
            .entry(clash_attr("cid"))
            .or_default()
            .push(observation);
        Ok(())
    }

    /// Resolve each contact-id group into at most one pair. Groups whose
    /// size is not exactly two are dropped, as are pairs where either atom
    /// is a hydrogen.
    pub fn resolve(self) -> Vec<ClashPair> {
        let mut pairs = Vec::new();
        for (_, group) in self.groups {
            let Ok([first, second]) = <[ClashObservation; 2]>::try_from(group) else {
                continue;
            };
            if first.side.atom.starts_with('H') || second.side.atom.starts_with('H') {
                continue;
            }
            pairs.push(ClashPair {
                res1: first.side,
                res2: second.side,
                dist: first.dist,
                clashmag: first.clashmag,
            });
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::parse_report;

    fn accumulate(xml: &str) -> Vec<ClashPair> {
        let doc = parse_report(xml).unwrap();
        let mut accumulator = ClashAccumulator::default();
        for residue in doc.descendants().filter(|n| n.has_tag_name("ModelledSubgroup")) {
            for clash in residue.children().filter(|n| n.has_tag_name("clash")) {
                accumulator.observe(&residue, &clash, 2.2).unwrap();
            }
        }
        accumulator.resolve()
    }

    #[test]
    fn test_two_member_group_resolves() {
        let pairs = accumulate(
            r#"<r>
                <ModelledSubgroup chain="A" model="1" resnum="10" resname="ALA">
                    <clash atom="CA" cid="7" clashmag="0.5" dist="2.0"/>
                </ModelledSubgroup>
                <ModelledSubgroup chain="B" model="1" resnum="22" resname="GLY">
                    <clash atom="CB" cid="7" clashmag="0.5" dist="2.0"/>
                </ModelledSubgroup>
            </r>"#,
        );
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].res1.atom, "CA");
        assert_eq!(pairs[0].res1.chain, "A");
        assert_eq!(pairs[0].res2.atom, "CB");
        assert_eq!(pairs[0].res2.resname, "GLY");
        assert_eq!(pairs[0].dist, "2.0");
        assert_eq!(pairs[0].clashmag, "0.5");
    }

    #[test]
    fn test_three_member_group_dropped() {
        let pairs = accumulate(
            r#"<ModelledSubgroup chain="A">
                <clash atom="CA" cid="7" clashmag="0.5" dist="2.0"/>
                <clash atom="CB" cid="7" clashmag="0.5" dist="2.0"/>
                <clash atom="CG" cid="7" clashmag="0.5" dist="2.0"/>
            </ModelledSubgroup>"#,
        );
        assert!(pairs.is_empty());
    }

    #[test]
    fn test_singleton_group_dropped() {
        let pairs = accumulate(
            r#"<ModelledSubgroup chain="A">
                <clash atom="CA" cid="9" clashmag="0.5" dist="2.0"/>
            </ModelledSubgroup>"#,
        );
        assert!(pairs.is_empty());
    }

    #[test]
    fn test_hydrogen_atoms_excluded() {
        let pairs = accumulate(
            r#"<ModelledSubgroup chain="A">
                <clash atom="HB2" cid="3" clashmag="0.5" dist="2.0"/>
                <clash atom="CB" cid="3" clashmag="0.5" dist="2.0"/>
            </ModelledSubgroup>"#,
        );
        assert!(pairs.is_empty());
    }

    #[test]
    fn test_distant_contacts_discarded_before_grouping() {
        // The far observation leaves its partner in a singleton group.
        let pairs = accumulate(
            r#"<ModelledSubgroup chain="A">
                <clash atom="CA" cid="4" clashmag="0.5" dist="2.0"/>
                <clash atom="CB" cid="4" clashmag="0.5" dist="2.2"/>
            </ModelledSubgroup>"#,
        );
        assert!(pairs.is_empty());
    }

    #[test]
    fn test_non_numeric_distance_is_fatal() {
        let doc = parse_report(
            r#"<ModelledSubgroup chain="A">
                <clash atom="CA" cid="4" clashmag="0.5" dist="close"/>
            </ModelledSubgroup>"#,
        )
        .unwrap();
        let residue = doc.root_element();
        let clash = residue.children().find(|n| n.is_element()).unwrap();

        let mut accumulator = ClashAccumulator::default();
        let err = accumulator.observe(&residue, &clash, 2.2).unwrap_err();
        assert!(matches!(err, AnalyzerError::NumericAttribute { .. }));
    }
}
