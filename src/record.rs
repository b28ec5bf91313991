//! Outlier record model and the category registry.
//!
//! Every outlier category has a fixed attribute schema; records for a
//! category therefore carry a uniform field set no matter which residue
//! produced them. The registry below is the single source of truth for each
//! category's name, schema, and inclusion filter.

use roxmltree::Node;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Identity of the residue that owns an outlier, read off a
/// `ModelledSubgroup` element. Missing attributes become empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResidueContext {
    pub model: String,
    pub ent: String,
    pub chain: String,
    pub resname: String,
    pub resnum: String,
    pub icode: String,
}

impl ResidueContext {
    pub(crate) fn from_node(node: &Node) -> Self {
        let attr = |name| node.attribute(name).unwrap_or("").to_string();
        Self {
            model: attr("model"),
            ent: attr("ent"),
            chain: attr("chain"),
            resname: attr("resname"),
            resnum: attr("resnum"),
            icode: attr("icode"),
        }
    }

    /// Identity fields in their canonical order, for merging into records.
    pub(crate) fn fields(&self) -> [(&'static str, &str); 6] {
        [
            ("model", &self.model),
            ("ent", &self.ent),
            ("chain", &self.chain),
            ("resname", &self.resname),
            ("resnum", &self.resnum),
            ("icode", &self.icode),
        ]
    }
}

/// The closed set of outlier categories extracted from a validation report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutlierCategory {
    /// R-free difference between DCC and deposited values
    RFreeDiff,
    /// R-work difference between DCC and deposited values
    RWorkDiff,
    /// Ramachandran torsion outlier
    Torsion,
    /// Polymer real-space R-value Z-score outlier
    PolymerRsrz,
    /// Ligand real-space R-value Z-score outlier
    LigandRsrz,
    /// Covalent bond geometry outlier
    Bond,
    /// Bond angle geometry outlier
    Angle,
    /// Mogul bond length outlier
    MogBond,
    /// Mogul bond angle outlier
    MogAngle,
    /// Mogul ring geometry outlier
    MogRing,
    /// Mogul torsion outlier
    MogTorsion,
    /// Chirality problem
    Chiral,
    /// Planarity outlier
    Plane,
}

impl OutlierCategory {
    pub const ALL: [OutlierCategory; 13] = [
        OutlierCategory::RFreeDiff,
        OutlierCategory::RWorkDiff,
        OutlierCategory::Torsion,
        OutlierCategory::PolymerRsrz,
        OutlierCategory::LigandRsrz,
        OutlierCategory::Bond,
        OutlierCategory::Angle,
        OutlierCategory::MogBond,
        OutlierCategory::MogAngle,
        OutlierCategory::MogRing,
        OutlierCategory::MogTorsion,
        OutlierCategory::Chiral,
        OutlierCategory::Plane,
    ];

    /// Category name as it appears in the report and in consumer queries.
    /// For child-element categories this is also the XML tag name.
    pub fn name(self) -> &'static str {
        match self {
            OutlierCategory::RFreeDiff => "r_free_diff",
            OutlierCategory::RWorkDiff => "r_work_diff",
            OutlierCategory::Torsion => "torsion-outlier",
            OutlierCategory::PolymerRsrz => "polymer-rsrz-outlier",
            OutlierCategory::LigandRsrz => "ligand-rsrz-outlier",
            OutlierCategory::Bond => "bond-outlier",
            OutlierCategory::Angle => "angle-outlier",
            OutlierCategory::MogBond => "mog-bond-outlier",
            OutlierCategory::MogAngle => "mog-angle-outlier",
            OutlierCategory::MogRing => "mog-ring-outlier",
            OutlierCategory::MogTorsion => "mog-torsion-outlier",
            OutlierCategory::Chiral => "chiral-outlier",
            OutlierCategory::Plane => "plane-outlier",
        }
    }

    /// Reverse lookup for string-keyed consumer queries.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.name() == name)
    }
}

/// Inclusion filter applied before a child element becomes a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ChildFilter {
    /// Every matching element produces a record.
    Always,
    /// Drop standard backbone linkage bonds: atom0 in {C, O3'} paired with
    /// atom1 in {N, P} is a peptide/phosphodiester bond, not an outlier pair
    /// worth reporting per residue.
    BackboneLinkage,
    /// Keep only |Zscore| above the configured Mogul cutoff.
    MogZscore,
}

/// One row of the category registry for child-element categories.
pub(crate) struct ChildRule {
    pub category: OutlierCategory,
    pub schema: &'static [&'static str],
    pub filter: ChildFilter,
}

const MOG_DISTRIBUTION_SCHEMA: &[&str] =
    &["atoms", "mean", "mindiff", "stdev", "numobs", "Zscore", "obsval"];
const MOG_GEOMETRY_SCHEMA: &[&str] = &["atoms", "mean", "mindiff", "stdev", "numobs", "obsval"];

/// Registry of child-element categories: schema and inclusion filter per
/// tag. `clash` children are not listed here; they route to the clash
/// resolver instead of a category list.
pub(crate) const CHILD_RULES: &[ChildRule] = &[
    ChildRule {
        category: OutlierCategory::Bond,
        schema: &["atom0", "atom1", "mean", "stdev", "obs", "z", "link"],
        filter: ChildFilter::BackboneLinkage,
    },
    ChildRule {
        category: OutlierCategory::Angle,
        schema: &["atom0", "atom1", "atom2", "mean", "stdev", "obs", "z", "link"],
        filter: ChildFilter::Always,
    },
    ChildRule {
        category: OutlierCategory::MogBond,
        schema: MOG_DISTRIBUTION_SCHEMA,
        filter: ChildFilter::MogZscore,
    },
    ChildRule {
        category: OutlierCategory::MogAngle,
        schema: MOG_DISTRIBUTION_SCHEMA,
        filter: ChildFilter::MogZscore,
    },
    ChildRule {
        category: OutlierCategory::MogRing,
        schema: MOG_GEOMETRY_SCHEMA,
        filter: ChildFilter::Always,
    },
    ChildRule {
        category: OutlierCategory::MogTorsion,
        schema: MOG_GEOMETRY_SCHEMA,
        filter: ChildFilter::Always,
    },
    ChildRule {
        category: OutlierCategory::Chiral,
        schema: &["atom", "problem"],
        filter: ChildFilter::Always,
    },
    ChildRule {
        category: OutlierCategory::Plane,
        schema: &["omega", "improper", "planeRMSD", "type"],
        filter: ChildFilter::Always,
    },
];

/// A single outlier observation: an ordered list of named string fields.
///
/// Field names are drawn from the category registry, so every record in a
/// category exposes the same names in the same order. Serializes as a map.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OutlierRecord {
    fields: Vec<(&'static str, String)>,
}

impl OutlierRecord {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, name: &'static str, value: String) {
        self.fields.push((name, value));
    }

    /// Look up a field value by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Field names in schema order.
    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(n, _)| *n)
    }

    /// All fields in schema order.
    pub fn fields(&self) -> &[(&'static str, String)] {
        &self.fields
    }
}

impl Serialize for OutlierRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
