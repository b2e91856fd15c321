//! Error types for vtree_core.

use thiserror::Error;

/// Result type alias using vtree_core's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building, decoding or scanning tree entries.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error occurred during file operations.
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Input ended before a field of a serialized entry could be read.
    #[error("Can not read tree entry {field}, bytes remaining {remaining}, need {needed}")]
    Truncated {
        field: &'static str,
        remaining: usize,
        needed: usize,
    },

    /// Unknown entry type ordinal in a serialized entry.
    #[error("Invalid tree entry type: {value}")]
    InvalidEntryType { value: u8 },

    /// Invalid hash format or encoding.
    #[error("Invalid hash: {reason}")]
    InvalidHash { reason: String },

    /// Name is not a valid single path segment.
    #[error("Invalid path component {name:?}: {reason}")]
    InvalidPathComponent { name: String, reason: String },

    /// Aux data was already set to a different value.
    #[error("Conflicting {field} for tree entry {name}: already {existing}, got {new}")]
    AuxDataConflict {
        name: String,
        field: &'static str,
        existing: String,
        new: String,
    },

    /// Mode bits do not describe a supported entry type.
    #[error("Unsupported mode: {mode:o}")]
    UnsupportedMode { mode: u32 },
}

impl Error {
    /// Create a Truncated error.
    pub fn truncated(field: &'static str, remaining: usize, needed: usize) -> Self {
        Error::Truncated {
            field,
            remaining,
            needed,
        }
    }

    /// Create an InvalidEntryType error.
    pub fn invalid_entry_type(value: u8) -> Self {
        Error::InvalidEntryType { value }
    }

    /// Create an InvalidHash error.
    pub fn invalid_hash(reason: impl Into<String>) -> Self {
        Error::InvalidHash {
            reason: reason.into(),
        }
    }

    /// Create an InvalidPathComponent error.
    pub fn invalid_path_component(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidPathComponent {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create an AuxDataConflict error.
    pub fn aux_data_conflict(
        name: impl Into<String>,
        field: &'static str,
        existing: impl ToString,
        new: impl ToString,
    ) -> Self {
        Error::AuxDataConflict {
            name: name.into(),
            field,
            existing: existing.to_string(),
            new: new.to_string(),
        }
    }

    /// Create an UnsupportedMode error.
    pub fn unsupported_mode(mode: u32) -> Self {
        Error::UnsupportedMode { mode }
    }
}

// Additional From implementations for external error types

impl From<ignore::Error> for Error {
    fn from(err: ignore::Error) -> Self {
        // ignore::Error can wrap an io::Error or be a path error
        match err.io_error() {
            Some(io_err) => Error::Io {
                source: std::io::Error::new(io_err.kind(), io_err.to_string()),
            },
            None => Error::Io {
                source: std::io::Error::other(err.to_string()),
            },
        }
    }
}
