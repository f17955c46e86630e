//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]`.

use thiserror::Error;

use crate::category::Dimension;

/// Errors raised by the category-key primitives in this crate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A dimension size of zero, or a product of sizes that overflows `usize`.
    #[error("configuration error: {0}")]
    Config(String),

    /// A category component lies outside its configured range.
    #[error("{dimension} {value} out of range (size {size})")]
    KeyOutOfRange {
        dimension: Dimension,
        value:     usize,
        size:      usize,
    },

    /// A compound id outside `[0, bucket_count)` was passed to `decode`.
    #[error("compound index {index} out of range (bucket count {bucket_count})")]
    CompoundOutOfRange {
        index:        usize,
        bucket_count: usize,
    },
}

/// Shorthand result type for `ce-core`.
pub type CoreResult<T> = Result<T, CoreError>;
