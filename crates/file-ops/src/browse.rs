//! Depth-bounded recursive directory listing.

use serde::{Deserialize, Serialize};

use sdstream_storage::{StorageBackend, StorageError, Volume};

/// One discovered file or directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    /// Full volume-relative path, `/`-joined.
    pub path: String,
    /// Size in bytes; 0 for directories.
    pub size: u64,
    /// Whether this entry is a directory.
    pub is_dir: bool,
}

/// Recursively lists the tree under `path`.
///
/// `max_depth == 0` lists immediate children only; each extra level
/// descends one directory further. Entries come out in pre-order (a
/// directory before its children); sibling order is whatever the backend
/// enumeration yields. The self and parent entries never appear.
///
/// A single entry whose metadata cannot be read is logged and listed with
/// size 0; an unopenable subdirectory is logged and skipped, keeping
/// everything collected so far. Only an unopenable `path` itself fails
/// the call.
pub fn list<B: StorageBackend>(
    volume: &Volume<B>,
    path: &str,
    max_depth: u8,
) -> Result<Vec<FileInfo>, StorageError> {
    let mut entries = Vec::new();
    walk(volume, path, max_depth, &mut entries)?;
    Ok(entries)
}

/// Like [`list`], but projects each entry to its path.
pub fn list_paths<B: StorageBackend>(
    volume: &Volume<B>,
    path: &str,
    max_depth: u8,
) -> Result<Vec<String>, StorageError> {
    Ok(list(volume, path, max_depth)?
        .into_iter()
        .map(|info| info.path)
        .collect())
}

fn walk<B: StorageBackend>(
    volume: &Volume<B>,
    dir: &str,
    depth: u8,
    out: &mut Vec<FileInfo>,
) -> Result<(), StorageError> {
    let abs = volume.resolve(dir)?;
    let children = volume
        .backend()
        .read_dir(&abs)
        .map_err(|source| StorageError::Enumerate {
            path: dir.to_string(),
            source,
        })?;

    for entry in children {
        let full = join_entry(dir, &entry.name);
        let size = if entry.is_dir {
            0
        } else {
            match volume.file_size(&full) {
                Ok(size) => size,
                Err(e) => {
                    tracing::warn!(path = %full, error = %e, "failed to stat entry, skipping size");
                    0
                }
            }
        };
        out.push(FileInfo {
            path: full.clone(),
            size,
            is_dir: entry.is_dir,
        });

        if entry.is_dir && depth > 0 {
            // A bad subtree must not abort the rest of the walk.
            if let Err(e) = walk(volume, &full, depth - 1, out) {
                tracing::warn!(path = %full, error = %e, "failed to descend into directory");
            }
        }
    }
    Ok(())
}

fn join_entry(dir: &str, name: &str) -> String {
    let trimmed = dir.trim_end_matches('/');
    if trimmed.is_empty() {
        format!("/{name}")
    } else {
        format!("{trimmed}/{name}")
    }
}
