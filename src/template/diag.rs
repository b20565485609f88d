//! Advisory diagnostics
//!
//! Expansion never fails; everything it has to complain about becomes a
//! [`Warning`] collected alongside the output. Callers decide whether
//! warnings are ignorable noise or a build failure (see `--strict`).

use thiserror::Error;

/// A non-fatal problem noticed during expansion.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A marker named a filter the engine doesn't know. The value passes
    /// through unchanged.
    #[error("unknown filter \"{name}\" in {marker}")]
    UnknownFilter { name: String, marker: String },

    /// A marker's path resolved to nothing; the marker was left verbatim.
    #[error("variable {path} not found in data")]
    UnresolvedPath { path: String },

    /// An iteration path resolved to something other than a sequence; the
    /// block was rendered empty.
    #[error("{path} is not a sequence (got {found})")]
    NotASequence { path: String, found: &'static str },

    /// An iteration path resolved to nothing at all. Only reported for
    /// dotless paths; nested sections are often legitimately absent.
    #[error("{path} is not a sequence or not found")]
    SequenceNotFound { path: String },
}
