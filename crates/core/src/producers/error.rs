use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::errors::BoxError;
use crate::values::ValueKind;

/// Failure of a value producer, or of converting its output into a field's type.
#[derive(Debug, Error)]
pub enum ProduceError {
    #[error("value producer does not support kind: {kind}")]
    UnsupportedKind { kind: ValueKind },

    #[error("expected a {expected} value, got {found}")]
    Mismatch {
        expected: ValueKind,
        found: &'static str,
    },

    #[error("{value} is out of range for {kind}")]
    OutOfRange { value: String, kind: ValueKind },

    #[error("invalid {kind} literal {input:?}: {reason}")]
    Parse {
        input: String,
        kind: ValueKind,
        reason: String,
    },

    #[error("failed to parse list: {}", .failures.join("; "))]
    Sequence { failures: Vec<String> },

    #[error("failed to read {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("failed to decode {} as {format}: {reason}", .path.display())]
    Decode {
        path: PathBuf,
        format: String,
        reason: String,
    },

    #[error("no extension or format option given for file: {}", .path.display())]
    MissingFormat { path: PathBuf },

    #[error("unable to read file {}, unrecognized file format {format}", .path.display())]
    UnknownFormat { path: PathBuf, format: String },

    #[error("field is read-only")]
    ReadOnly,

    #[error(transparent)]
    Custom(BoxError),
}

impl ProduceError {
    /// Wrap an arbitrary error raised by a custom producer
    pub fn custom(error: impl Into<BoxError>) -> Self {
        Self::Custom(error.into())
    }
}
