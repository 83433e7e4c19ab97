//! Error kinds reported by the inventory core. Each one is handled where it
//! occurs; none of them ends a session.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Reasons a snapshot could not be read or written.
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("snapshot {path} is corrupt: {reason}")]
    Corrupt { path: PathBuf, reason: String },
}

/// Rejected user input for the delete prompt.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("No ID was entered.")]
    EmptyTarget,

    #[error("This is not an integer.")]
    NotAnInteger(String),

    #[error("CD IDs are positive numbers; {0} can never match.")]
    OutOfRange(String),
}

/// Unexpected shape seen by the identifier allocator. The allocator still
/// produces an id; this only travels alongside it as a diagnostic.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AllocatorAnomaly {
    #[error("last CD has id {0}; no higher id is available, restarting at 1")]
    Exhausted(u32),

    #[error("last CD has invalid id 0, restarting at 1")]
    InvalidLastId,
}
