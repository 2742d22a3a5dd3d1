//! Error types and handling for the CLI
//!
//! Validation findings are not errors: they are rendered as output and
//! reflected in the exit code. The error type here covers operational
//! failures only (unreadable files, malformed JSON input, IO).

use std::io;
use std::path::PathBuf;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for CLI operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error (file operations, etc.)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Error from seqspec-core library
    #[error("Core error: {0}")]
    Core(#[from] seqspec_core::Error),

    /// File not found
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// Supplied document is not valid JSON
    #[error("Invalid JSON in {}: {message}", path.display())]
    InvalidJson { path: PathBuf, message: String },

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// Process exit code for operational failures
    pub fn exit_code(&self) -> i32 {
        2
    }
}

/// Format an error for terminal display
pub fn format_error(error: &Error, use_color: bool) -> String {
    if use_color {
        use colored::Colorize;
        format!("{} {error}", "error:".red().bold())
    } else {
        format!("error: {error}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_not_found_display() {
        let err = Error::FileNotFound {
            path: PathBuf::from("missing.mmd"),
        };
        assert_eq!(err.to_string(), "File not found: missing.mmd");
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_format_error_plain() {
        let err = Error::FileNotFound {
            path: PathBuf::from("x"),
        };
        assert_eq!(format_error(&err, false), "error: File not found: x");
    }
}
