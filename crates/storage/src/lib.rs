//! Storage backend abstraction for block-oriented media.
//!
//! Defines the capability set a mounted storage namespace must provide
//! (open, read/write handles, metadata, enumeration, removal) and a
//! [`Volume`] type that threads an explicit storage root through every
//! operation. Higher layers (streaming channels, chunked transfer, tree
//! walks) are written against [`StorageBackend`] so platform variants and
//! test doubles can coexist.

mod backend;
mod std_fs;
mod volume;

pub use backend::{EntryInfo, Metadata, RawFile, SpaceInfo, StorageBackend};
pub use std_fs::StdFs;
pub use volume::Volume;

/// Errors produced by the storage crate.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to list directory {path}: {source}")]
    Enumerate {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("not a directory: {0}")]
    NotADirectory(String),

    #[error("is a directory: {0}")]
    IsADirectory(String),

    #[error("not supported by this backend: {0}")]
    Unsupported(&'static str),
}
