//! Error types for the Sekai sticker library.
//!
//! Load failures never cross the manager's public boundary as errors; they are
//! turned into notifications there. These types cover the fetch adapter, the
//! settings layer, and the RPC front end.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the Sekai sticker library.
#[derive(Debug, Error)]
pub enum SekaiError {
    // Network errors
    #[error("Network error: {message}")]
    Network {
        message: String,
        /// Optional cause description
        cause: Option<String>,
    },

    #[error("Request timeout after {0:?}")]
    Timeout(std::time::Duration),

    #[error("HTTP {status} from {url}: {reason}")]
    HttpStatus {
        url: String,
        status: u16,
        reason: String,
    },

    // Document errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    #[error("Invalid {document}: {message}")]
    InvalidDocument { document: String, message: String },

    // File system errors
    #[error("IO error at {path:?}: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    // Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid params: {message}")]
    InvalidParams { message: String },

    #[error("Repository not found: {url}")]
    RepositoryNotFound { url: String },

    #[error("Character not found: {unique_id}")]
    CharacterNotFound { unique_id: String },

    #[error("Method not found: {method}")]
    MethodNotFound { method: String },

    // Generic errors
    #[error("{0}")]
    Other(String),
}

/// Result type alias for Sekai operations.
pub type Result<T> = std::result::Result<T, SekaiError>;

impl From<std::io::Error> for SekaiError {
    fn from(err: std::io::Error) -> Self {
        SekaiError::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

impl From<serde_json::Error> for SekaiError {
    fn from(err: serde_json::Error) -> Self {
        SekaiError::Json {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl SekaiError {
    /// Create an IO error with path context.
    pub fn io_with_path(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        SekaiError::Io {
            message: err.to_string(),
            path: Some(path.into()),
            source: Some(err),
        }
    }

    /// Create a document validation error.
    pub fn invalid_document(document: impl Into<String>, message: impl Into<String>) -> Self {
        SekaiError::InvalidDocument {
            document: document.into(),
            message: message.into(),
        }
    }

    /// Convert to a JSON-RPC error code.
    ///
    /// Custom error codes (application-defined, -32000 to -32099):
    /// - -32000: Network/connectivity error
    /// - -32001: Repository not found
    /// - -32002: Character not found
    /// - -32003: Malformed repository document
    /// - -32601: Method not found
    /// - -32602: Invalid params
    pub fn to_rpc_error_code(&self) -> i32 {
        match self {
            SekaiError::Network { .. } | SekaiError::Timeout(_) | SekaiError::HttpStatus { .. } => {
                -32000
            }

            SekaiError::RepositoryNotFound { .. } => -32001,

            SekaiError::CharacterNotFound { .. } => -32002,

            SekaiError::Json { .. } | SekaiError::InvalidDocument { .. } => -32003,

            SekaiError::MethodNotFound { .. } => -32601,

            SekaiError::InvalidParams { .. } => -32602,

            _ => -32603,
        }
    }

    /// Whether the failure came from the network rather than the document contents.
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            SekaiError::Network { .. } | SekaiError::Timeout(_) | SekaiError::HttpStatus { .. }
        )
    }
}
