//! Error types for the Seqspec core library
//!
//! The conversion pipeline itself never fails: malformed input is reported
//! through diagnostic records (see [`crate::validation`]). The error type here
//! covers the few operations that can genuinely fail, such as serializing a
//! generated document.

use thiserror::Error;

/// Main error type for Seqspec operations
#[derive(Error, Debug)]
pub enum Error {
    /// JSON serialization/deserialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// Document-level failures outside the diagnostics contract
    #[error("Document error: {message}")]
    Document { message: String },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a document error with a message
    pub fn document(message: impl Into<String>) -> Self {
        Error::Document {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            message: err.to_string(),
            source: err,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::document("components missing");
        assert_eq!(err.to_string(), "Document error: components missing");
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = json_err.into();
        assert!(err.to_string().starts_with("JSON error"));
    }
}
