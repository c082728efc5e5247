use std::fmt;
use thiserror::Error;

/// Unified error type for all colfill operations.
///
/// Errors propagate upward through the call stack using Rust's `?` operator.
/// The engine treats every variant except [`Error::Internal`] as a caller or
/// source-data problem; `Internal` indicates a violated invariant inside the
/// engine or store.
#[derive(Error, Debug)]
pub enum Error {
    /// The ingestion engine was used before `init` ran.
    ///
    /// `names`, `types`, `row_count`, and `fill_table` all require the
    /// engine to have cached the source's column names and inferred types
    /// first.
    #[error("ingestion engine used before initialization")]
    NotInitialized,

    /// The schema names a column that is absent from the source data.
    ///
    /// Source columns are resolved by name, not position, so a rename on
    /// either side surfaces here rather than as silently transposed data.
    #[error("cannot fill column '{0}': not present in the source data")]
    UnknownColumn(String),

    /// A source column is not a recognized typed-array-like buffer.
    ///
    /// Fatal during type inference: ingestion assumes uniform array-backed
    /// columns across the table. (A buffer that merely cannot be bulk-copied
    /// is not an error; the engine falls back to per-element conversion.)
    #[error("unsupported source buffer: {0}")]
    UnsupportedSourceBuffer(String),

    /// Row-number index generation was requested with a non-positive limit.
    ///
    /// The limit is used as a modulus, so zero is never valid.
    #[error("row index generation requires a positive limit, got {0}")]
    InvalidLimit(u32),

    /// A destination column lookup failed.
    #[error("column '{0}' is not present in the table")]
    ColumnNotFound(String),

    /// A cell value does not match the destination column's storage type.
    ///
    /// This is an internal invariant of the fill dispatch, not a steady-state
    /// input condition: conversions happen before `set_nth` is reached.
    #[error("type mismatch: column stores {expected}, got {got}")]
    TypeMismatch {
        expected: &'static str,
        got: &'static str,
    },

    /// Internal error indicating a bug or unexpected state.
    #[error("an internal operation failed: {0}")]
    Internal(String),
}

impl Error {
    /// Create an [`Error::Internal`] from any displayable error.
    #[inline]
    pub fn internal<E: fmt::Display>(err: E) -> Self {
        Error::Internal(err.to_string())
    }

    /// Create an [`Error::UnsupportedSourceBuffer`] from any displayable
    /// error.
    #[inline]
    pub fn unsupported_buffer<E: fmt::Display>(err: E) -> Self {
        Error::UnsupportedSourceBuffer(err.to_string())
    }
}
