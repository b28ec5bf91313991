//! Report loading: one blocking file read and one full-tree parse.
//!
//! There is no streaming or partial parse; a document that is not
//! well-formed XML fails fast and leaves the caller with an error instead
//! of a half-populated analyzer.

use std::fs;
use std::path::Path;

use roxmltree::Document;

use crate::error::Result;

/// Read a validation report file into memory.
pub fn read_report(path: &Path) -> Result<String> {
    Ok(fs::read_to_string(path)?)
}

/// Parse a report held in memory, propagating any well-formedness error.
pub fn parse_report(text: &str) -> Result<Document<'_>> {
    Ok(Document::parse(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalyzerError;

    #[test]
    fn test_parse_well_formed() {
        let doc = parse_report("<Entry DataCompleteness=\"0.97\"/>").unwrap();
        assert_eq!(doc.root_element().tag_name().name(), "Entry");
    }

    #[test]
    fn test_parse_malformed_fails() {
        let err = parse_report("<Entry><unclosed></Entry>").unwrap_err();
        assert!(matches!(err, AnalyzerError::Xml(_)));
    }

    #[test]
    fn test_read_missing_file_fails() {
        let err = read_report(Path::new("/nonexistent/report.xml")).unwrap_err();
        assert!(matches!(err, AnalyzerError::Io(_)));
    }
}
