use serde::{Deserialize, Serialize};

/// Threshold configuration for report analysis.
///
/// The defaults reproduce the cutoffs used by the validation pipeline;
/// callers normally construct an analyzer without touching these and only
/// override them when a report version changes its conventions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerOptions {
    /// Maximum tolerated |DCC - PDB| difference for R / R-free before the
    /// pair is reported as a global outlier.
    pub r_metric_tolerance: f64,
    /// RSRZ value above which a polymer residue or ligand is an outlier.
    pub rsrz_cutoff: f64,
    /// Absolute Mogul Z-score above which a bond/angle deviation is kept.
    pub mog_zscore_cutoff: f64,
    /// Contacts at or beyond this distance are not treated as clashes.
    pub clash_distance_cutoff: f64,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self {
            r_metric_tolerance: 0.05,
            rsrz_cutoff: 5.0,
            mog_zscore_cutoff: 10.0,
            clash_distance_cutoff: 2.2,
        }
    }
}
