//! Error types for the retex library.

use std::io;
use thiserror::Error;

/// Result type alias for retex operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while processing documents.
///
/// Malformed artifacts inside a document are never errors: the offending
/// fragment is left as-is and processing continues. Errors are reserved for
/// I/O and for templates that cannot be assembled at all.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input file is not valid UTF-8.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// A template is missing one of the literal injection markers.
    #[error("Template is missing injection marker: {0}")]
    MissingMarker(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::MissingMarker("% === BEGIN ===".to_string());
        assert_eq!(
            err.to_string(),
            "Template is missing injection marker: % === BEGIN ==="
        );

        let err = Error::Encoding("stray continuation byte".to_string());
        assert_eq!(err.to_string(), "Encoding error: stray continuation byte");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
