//! Error types that can be emitted from this library

use miette::Diagnostic;
use thiserror::Error;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent wrapper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Transparent wrapper for [`pak_archive::error::Error`]
    #[error(transparent)]
    Archive(#[from] pak_archive::error::Error),

    /// Transparent wrapper for [`glob::PatternError`]
    #[error(transparent)]
    Pattern(#[from] glob::PatternError),

    /// open mode string could not be parsed
    #[error("invalid open mode {0:?}")]
    InvalidMode(String),

    /// archive-backed paths only support read access
    #[error("{0} is archive-backed and read-only")]
    WriteNotSupported(String),

    /// a seek would have produced a negative position
    #[error("seek to negative position {0}")]
    InvalidSeek(i64),
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
