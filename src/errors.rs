//! Unified error handling.
//!
//! A `thiserror`-based model with:
//!   * Typed variants for the failure domains of the tool
//!   * A categorization layer (`ErrorCategory`) for reporting
//!   * Helper constructors
//!   * `From` conversions for common lower-level errors
//!
//! Most failures met while looking up a `security.txt` are NOT errors in
//! this sense: a missing document, an undecodable body or a document without
//! usable contacts all have a deterministic fallback and are only reported
//! through the diagnostics sink. The variants here cover what may reach the
//! caller (usage / environment problems) plus the transport errors that the
//! HTTP source produces internally before folding them into "no document".
//!
//! Categories:
//!   - Input: User / configuration issues
//!   - Network: Transport or remote-service problems
//!   - Internal: Local I/O, rendering, unexpected states
//!
//! NOTE: Variants that wrap external errors retain sources to preserve backtraces
//!       (when RUST_BACKTRACE=1).

use std::io;

use thiserror::Error;

use crate::config::ConfigError;

/// High-level classification for structured reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Network,
    Internal,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorCategory::Input => "input",
            ErrorCategory::Network => "network",
            ErrorCategory::Internal => "internal",
        };
        f.write_str(s)
    }
}

/// Primary application error type.
#[derive(Error, Debug)]
pub enum SecTxtError {
    // ------------------------ Input / Validation ----------------------------
    #[error("Invalid hostname: '{hostname}'")]
    InvalidHostname { hostname: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    // ----------------------------- Network ----------------------------------
    #[error("Network error during {operation} for '{target}': {source}")]
    Network {
        operation: String,
        target: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("HTTP status {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Document at {url} exceeds the {limit} byte limit")]
    DocumentTooLarge { url: String, limit: usize },

    // ----------------------------- I/O / FS ---------------------------------
    #[error("I/O error during {operation} on {path}: {source}")]
    Io {
        path: String,
        operation: String,
        #[source]
        source: io::Error,
    },

    // ---------------------------- Internal ----------------------------------
    #[error("Failed to render {format} output: {reason}")]
    Serialization { format: String, reason: String },

    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl SecTxtError {
    /// Categorize the error for structured output.
    pub fn category(&self) -> ErrorCategory {
        use SecTxtError::*;
        match self {
            InvalidHostname { .. } | Configuration { .. } => ErrorCategory::Input,

            Network { .. } | HttpStatus { .. } | DocumentTooLarge { .. } => ErrorCategory::Network,

            Io { .. } | Serialization { .. } | Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Process exit code for an error that reached the CLI: 2 for rejected
    /// input, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Input => 2,
            ErrorCategory::Network | ErrorCategory::Internal => 1,
        }
    }

    // ---------------------------- Constructors -----------------------------

    pub fn invalid_hostname(hostname: impl Into<String>) -> Self {
        Self::InvalidHostname {
            hostname: hostname.into(),
        }
    }

    pub fn network(
        operation: impl Into<String>,
        target: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Network {
            operation: operation.into(),
            target: target.into(),
            source: source.into(),
        }
    }

    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    pub fn document_too_large(url: impl Into<String>, limit: usize) -> Self {
        Self::DocumentTooLarge {
            url: url.into(),
            limit,
        }
    }

    pub fn io(path: impl Into<String>, operation: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            operation: operation.into(),
            source,
        }
    }

    pub fn serialization(format: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::Serialization {
            format: format.into(),
            reason: reason.to_string(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    pub fn internal_with(
        message: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Internal {
            message: message.into(),
            source: Some(source.into()),
        }
    }
}

/// Public result alias.
pub type Result<T> = std::result::Result<T, SecTxtError>;

/// Map standard IO errors into `Io` variant (generic context).
impl From<io::Error> for SecTxtError {
    fn from(e: io::Error) -> Self {
        SecTxtError::Io {
            path: "<unknown>".into(),
            operation: "unspecified".into(),
            source: e,
        }
    }
}

impl From<ConfigError> for SecTxtError {
    fn from(e: ConfigError) -> Self {
        SecTxtError::Configuration {
            message: e.to_string(),
        }
    }
}

impl From<serde_json::Error> for SecTxtError {
    fn from(e: serde_json::Error) -> Self {
        SecTxtError::serialization("json", e)
    }
}

impl From<serde_yaml::Error> for SecTxtError {
    fn from(e: serde_yaml::Error) -> Self {
        SecTxtError::serialization("yaml", e)
    }
}

/// Extension trait for enriching IO results with path + operation context.
pub trait IoResultExt<T> {
    fn with_path(self, path: impl Into<String>, operation: impl Into<String>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::result::Result<T, io::Error> {
    fn with_path(self, path: impl Into<String>, operation: impl Into<String>) -> Result<T> {
        self.map_err(|e| SecTxtError::io(path.into(), operation.into(), e))
    }
}
