use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Malformed content in a word-vector file
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// First line is missing or is not `<rows> <cols>`
    #[error("Bad header: {0}")]
    BadHeader(String),

    /// A data line ended before its token delimiter or before all numeric fields were read
    #[error("Truncated line {line} at byte offset {offset}")]
    TruncatedLine { line: usize, offset: usize },
}

/// Error types for loading word-vector files
#[derive(Error, Debug)]
pub enum LoadError {
    /// The file could not be opened
    #[error("Failed to open {}: {source}", .path.display())]
    Open { path: PathBuf, source: io::Error },

    /// Reading the file contents failed
    #[error("Failed to read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    /// Fewer bytes were read than the file size reported
    #[error("Short read on {}: expected {expected} bytes, got {actual}", .path.display())]
    ShortRead {
        path: PathBuf,
        expected: u64,
        actual: u64,
    },

    /// The file contents do not follow the word-vector text format
    #[error(transparent)]
    Format(#[from] FormatError),

    /// The cancel flag was raised while parsing
    #[error("Load cancelled after {rows_parsed} rows")]
    Cancelled { rows_parsed: usize },
}

impl LoadError {
    /// The underlying I/O error kind, if this is an I/O failure.
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            LoadError::Open { source, .. } | LoadError::Read { source, .. } => Some(source.kind()),
            LoadError::ShortRead { .. } => Some(io::ErrorKind::UnexpectedEof),
            _ => None,
        }
    }
}
