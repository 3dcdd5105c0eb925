//! # Driver Error Types

use thiserror::Error;

use tessera_core::CoreError;

/// Errors surfaced to the host application.
#[derive(Error, Debug)]
pub enum LoopError {
    /// The core reported a fatal condition (identifier exhaustion).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A configuration document failed to parse or validate.
    #[error("invalid loop configuration: {0}")]
    Config(String),

    /// A configuration file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that was being read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Result type for driver operations.
pub type LoopResult<T> = Result<T, LoopError>;
