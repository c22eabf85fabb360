//! Error types for pattern and noise kernels

use thiserror::Error;

/// Result type for pattern operations
pub type PatternResult<T> = Result<T, PatternError>;

/// Errors reported by the pattern and noise kernels
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PatternError {
    /// Non-positive counts, mismatched lengths, empty signals
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Scratch buffer could not be allocated
    #[error("resource exhausted: could not allocate {requested} elements")]
    ResourceExhausted { requested: usize },
}

impl PatternError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        PatternError::InvalidArgument(msg.into())
    }
}

/// Allocate an empty Vec with room for `len` items, reporting failure instead of aborting.
pub(crate) fn try_alloc<T>(len: usize) -> PatternResult<Vec<T>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| PatternError::ResourceExhausted { requested: len })?;
    Ok(buf)
}

/// `len` copies of `value`, reporting allocation failure instead of aborting.
pub(crate) fn try_filled<T: Clone>(len: usize, value: T) -> PatternResult<Vec<T>> {
    let mut buf = try_alloc(len)?;
    buf.resize(len, value);
    Ok(buf)
}
