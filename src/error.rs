use thiserror::Error;

/// Main analyzer error type that encompasses all possible failure modes
#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML parsing error: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("non-numeric value in <{element}> attribute {attribute}: {value:?}")]
    NumericAttribute {
        element: String,
        attribute: String,
        value: String,
    },
}

impl AnalyzerError {
    /// Build the error raised when a threshold test hits a non-numeric attribute.
    pub(crate) fn numeric(element: &str, attribute: &str, value: &str) -> Self {
        AnalyzerError::NumericAttribute {
            element: element.to_string(),
            attribute: attribute.to_string(),
            value: value.to_string(),
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AnalyzerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyzer_error_display() {
        let io_error = AnalyzerError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "File not found",
        ));
        assert!(io_error.to_string().contains("IO error"));

        let numeric = AnalyzerError::numeric("ModelledSubgroup", "rsrz", "abc");
        assert!(numeric.to_string().contains("ModelledSubgroup"));
        assert!(numeric.to_string().contains("rsrz"));
        assert!(numeric.to_string().contains("abc"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "Access denied");
        let analyzer_error: AnalyzerError = io_error.into();

        match analyzer_error {
            AnalyzerError::Io(_) => (),
            _ => panic!("Expected AnalyzerError::Io"),
        }
    }

    #[test]
    fn test_error_source_chain() {
        use std::error::Error;

        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let analyzer_error = AnalyzerError::Io(io_error);

        assert!(analyzer_error.source().is_some());
        assert_eq!(
            analyzer_error.source().unwrap().to_string(),
            "File not found"
        );
    }
}
