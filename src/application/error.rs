//! Application-level errors

use std::path::PathBuf;
use thiserror::Error;

/// Application errors cover everything outside the error-free tree core:
/// walking directories, compiling filters and loading configuration.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("path not found: {0}")]
    NotFound(PathBuf),

    #[error("invalid exclude pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("cannot walk {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
