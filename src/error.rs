//! Error types for the pageflow library.

use thiserror::Error;

/// Result type alias for pageflow operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur at the library boundary.
///
/// Geometry problems inside the reconstruction pipeline are never surfaced
/// here: an edge set that cannot form a grid or a glyph with a degenerate
/// bounding box is logged and omitted, and the page keeps whatever structure
/// was recoverable.
#[derive(Error, Debug)]
pub enum Error {
    /// A supplied configuration mapping is not of the recognized shape.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A known configuration option was given a value of the wrong type.
    #[error("configuration option '{key}' expects {expected}, got {actual}")]
    ConfigurationType {
        /// The option name
        key: String,
        /// Expected value type
        expected: &'static str,
        /// The JSON type actually supplied
        actual: &'static str,
    },

    /// The primitive set supplied for a document is unreadable as a whole.
    #[error("invalid primitive set: {0}")]
    InvalidPrimitives(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Configuration("not a JSON object".to_string());
        assert_eq!(err.to_string(), "configuration error: not a JSON object");

        let err = Error::ConfigurationType {
            key: "x_tolerance".to_string(),
            expected: "number",
            actual: "string",
        };
        assert_eq!(
            err.to_string(),
            "configuration option 'x_tolerance' expects number, got string"
        );
    }
}
