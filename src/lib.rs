//! # valreport Library
//!
//! Parses a structural-model validation report (the XML document produced by
//! an external validation pipeline) and exposes categorized, queryable
//! summaries: geometric outliers, atomic clashes, and chemical-shift mapping
//! statistics.
//!
//! The whole document is parsed exactly once, at construction of a
//! [`ReportAnalyzer`]; everything afterwards is a pure in-memory read.

pub mod analyzer;
pub mod clash;
pub mod config;
pub mod error;
pub mod loader;
pub mod record;
pub mod shifts;

mod classifier;
mod metrics;

pub use analyzer::ReportAnalyzer;
pub use clash::{ClashPair, ClashSide};
pub use config::AnalyzerOptions;
pub use error::{AnalyzerError, Result};
pub use record::{OutlierCategory, OutlierRecord, ResidueContext};
pub use shifts::{ChemicalShiftStatistics, ReferencingOffset, ShiftOutlier, UnmappedShift};
