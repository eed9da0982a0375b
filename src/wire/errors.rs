//! XML codec error types.

use thiserror::Error;

/// Errors raised while writing a request envelope or reading a response body.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum XmlError {
    /// The response body is not well-formed XML.
    #[error("Failed to parse XML response: {reason}")]
    Parse {
        /// What the parser rejected.
        reason: String,
    },

    /// The request envelope could not be written.
    #[error("Failed to write XML request: {reason}")]
    Write {
        /// What the writer rejected.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_message() {
        let error = XmlError::Parse {
            reason: "unexpected end of document".to_string(),
        };
        assert!(error.to_string().contains("unexpected end of document"));
    }
}
