//! Error types for the CLI

use thiserror::Error;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur in the CLI
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// External tool installation error
    #[error("Tool setup failed: {message}")]
    ToolSetup {
        /// Error message
        message: String,
    },

    /// Instrumented run error
    #[error("Coverage run failed: {message}")]
    Coverage {
        /// Error message
        message: String,
    },

    /// Static-analysis forwarding error
    #[error("Analysis forwarding failed: {message}")]
    Analysis {
        /// Error message
        message: String,
    },

    /// Result upload error
    #[error("Upload failed: {message}")]
    Upload {
        /// Error message
        message: String,
    },

    /// IO error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a tool setup error
    #[must_use]
    pub fn tool_setup(message: impl Into<String>) -> Self {
        Self::ToolSetup {
            message: message.into(),
        }
    }

    /// Create a coverage run error
    #[must_use]
    pub fn coverage(message: impl Into<String>) -> Self {
        Self::Coverage {
            message: message.into(),
        }
    }

    /// Create an analysis forwarding error
    #[must_use]
    pub fn analysis(message: impl Into<String>) -> Self {
        Self::Analysis {
            message: message.into(),
        }
    }

    /// Create an upload error
    #[must_use]
    pub fn upload(message: impl Into<String>) -> Self {
        Self::Upload {
            message: message.into(),
        }
    }
}
