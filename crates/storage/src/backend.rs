use std::io::{self, Read, Seek, Write};
use std::path::Path;

/// Byte-level file handle surfaced by a backend.
///
/// Blanket-implemented for anything that can read, write and seek, so
/// backends return their native handle type directly.
pub trait RawFile: Read + Write + Seek {}

impl<T: Read + Write + Seek> RawFile for T {}

/// Metadata for one path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metadata {
    /// Size in bytes as reported by the backend.
    pub size: u64,
    /// Whether the path is a directory.
    pub is_dir: bool,
}

/// One enumerated directory entry.
///
/// Classification is inline — callers never need a follow-up stat to tell
/// files from directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    /// Entry name (not a full path).
    pub name: String,
    /// Whether this entry is a directory.
    pub is_dir: bool,
}

/// Volume-wide capacity accounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpaceInfo {
    pub total: u64,
    pub used: u64,
    pub free: u64,
}

/// Capability set of a mounted block-storage namespace.
///
/// One implementation per target platform. Mounting and peripheral
/// initialization happen before a backend is constructed; every method
/// here operates on an already-reachable hierarchical path.
pub trait StorageBackend {
    type File: RawFile;

    /// Opens an existing file for reading.
    fn open_read(&self, path: &Path) -> io::Result<Self::File>;

    /// Opens a file for writing, creating it if absent.
    ///
    /// Truncates unless `append` is set.
    fn open_write(&self, path: &Path, append: bool) -> io::Result<Self::File>;

    /// Size and classification for `path`. Absence is `ErrorKind::NotFound`.
    fn metadata(&self, path: &Path) -> io::Result<Metadata>;

    /// Entries of the directory at `path`, in enumeration order.
    ///
    /// The self and parent entries (`.`, `..`) are never reported.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<EntryInfo>>;

    /// Creates a single directory (parent must exist).
    fn create_dir(&self, path: &Path) -> io::Result<()>;

    /// Removes an empty directory.
    fn remove_dir(&self, path: &Path) -> io::Result<()>;

    /// Removes a file.
    fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// Volume-wide capacity, where the platform exposes it.
    fn space(&self) -> io::Result<SpaceInfo> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "space accounting not available",
        ))
    }
}
