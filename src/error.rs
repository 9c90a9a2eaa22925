//! Error types for archive analysis
//!
//! Only run-level failures are errors. Problems with a single file are
//! reported as [`crate::extract::SkippedFile`] values instead.

use thiserror::Error;

/// Failures that abort a whole analysis run
#[derive(Debug, Error)]
pub enum HookError {
    /// The container could not be read as an archive
    #[error("invalid archive: {0}")]
    Archive(String),

    /// The archive exceeds the configured size ceiling
    #[error("archive is {size} bytes, which exceeds the limit of {limit} bytes")]
    ArchiveTooLarge { size: u64, limit: u64 },

    /// Nothing in the archive looked like a source file
    #[error("no source files found in archive")]
    NoSourceFiles,

    #[error("invalid configuration: {0}")]
    Config(String),

    /// A known-hooks reference file could not be parsed
    #[error("invalid reference hook file: {0}")]
    Reference(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),
}

pub type Result<T> = std::result::Result<T, HookError>;
