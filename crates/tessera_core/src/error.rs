//! # Core Error Types
//!
//! Absence (a missing component, an empty join, deleting a dead id) is never
//! an error in this crate. The only conditions that surface here are the
//! ones the caller has to decide about: running out of identifiers, and a
//! configuration document that cannot be used.

use thiserror::Error;

/// Errors that can escape the core.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Every recyclable id below the configured limit is live.
    #[error("entity ids exhausted: all {limit} ids are live")]
    IdsExhausted {
        /// Size of the id domain.
        limit: u32,
    },

    /// The permanent uid counter has no values left.
    #[error("entity uids exhausted")]
    UidsExhausted,

    /// A configuration document failed to parse or validate.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
