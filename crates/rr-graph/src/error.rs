//! Graph-subsystem error type.

use thiserror::Error;

/// Errors produced by `rr-graph`.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("{file}: bad magic number {found:#010x}")]
    BadMagic { file: String, found: u32 },

    #[error("{file}: unsupported format version {found} (expected {expected})")]
    UnsupportedVersion { file: String, found: u32, expected: u32 },

    #[error("{file}: truncated or corrupt record section")]
    Truncated { file: String },

    #[error("{file}: record references out-of-range index {index}")]
    BadIndex { file: String, index: u32 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type GraphResult<T> = Result<T, GraphError>;
