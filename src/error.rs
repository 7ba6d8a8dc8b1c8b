//! Failure taxonomy for the transform pipelines.
//!
//! The core performs no retries and no partial recovery: any error aborts the
//! current invocation. The binary layers `anyhow` context on top of these for
//! display.

use std::path::PathBuf;

use thiserror::Error;

/// Boxed codec/process error, kept intact for the caller to inspect.
type Source = Box<dyn std::error::Error + Send + Sync>;

/// Errors produced by the pipelines and their helpers.
#[derive(Debug, Error)]
pub enum Error {
    /// A caller-supplied parameter is malformed (non-positive rate or factor,
    /// crossfade percentage outside (0, 100], too many columns, ...).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Min-max normalization hit constant-valued data; rescaling would divide
    /// by zero.
    #[error("cannot normalize constant {0} (max == min)")]
    DegenerateSignal(&'static str),

    /// A crossfade window at least as long as one of the segments.
    #[error(
        "crossfade of {duration} samples needs segments longer than that \
         (got {first_len} and {second_len})"
    )]
    InsufficientLength {
        duration: usize,
        first_len: usize,
        second_len: usize,
    },

    /// An input file could not be read or parsed.
    #[error("failed to decode {path:?}: {source}")]
    Decode { path: PathBuf, source: Source },

    /// An output file could not be produced.
    #[error("failed to encode {path:?}: {source}")]
    Encode { path: PathBuf, source: Source },
}

impl Error {
    pub fn decode(path: impl Into<PathBuf>, source: impl Into<Source>) -> Self {
        Self::Decode {
            path: path.into(),
            source: source.into(),
        }
    }

    pub fn encode(path: impl Into<PathBuf>, source: impl Into<Source>) -> Self {
        Self::Encode {
            path: path.into(),
            source: source.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
