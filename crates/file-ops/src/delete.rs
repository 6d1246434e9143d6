//! Recursive deletion.

use sdstream_storage::{StorageBackend, StorageError, Volume};

use crate::browse::list;

/// Deletes `path` and, if it is a directory, everything beneath it.
///
/// Children are removed depth-first — files before their now-empty parent
/// directory. The first failing child aborts the call with the failing
/// path; what was already removed stays removed (at-least-attempted, not
/// atomic).
pub fn delete_recursive<B: StorageBackend>(
    volume: &Volume<B>,
    path: &str,
) -> Result<(), StorageError> {
    if volume.is_directory(path) {
        for child in list(volume, path, 0)? {
            delete_recursive(volume, &child.path)?;
        }
        volume.remove_directory(path)?;
        tracing::debug!(path, "removed directory");
    } else {
        volume.delete_file(path)?;
        tracing::debug!(path, "removed file");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn volume() -> (tempfile::TempDir, Volume) {
        let tmp = tempfile::tempdir().unwrap();
        let vol = Volume::new(tmp.path());
        (tmp, vol)
    }

    #[test]
    fn deletes_single_file() {
        let (tmp, vol) = volume();
        std::fs::write(tmp.path().join("f.txt"), b"x").unwrap();

        delete_recursive(&vol, "f.txt").unwrap();
        assert!(!tmp.path().join("f.txt").exists());
    }

    #[test]
    fn deletes_directory_with_file_and_nested_empty_dir() {
        let (tmp, vol) = volume();
        let root = tmp.path().join("bundle");
        std::fs::create_dir(&root).unwrap();
        std::fs::write(root.join("data.bin"), b"payload").unwrap();
        std::fs::create_dir(root.join("empty")).unwrap();

        delete_recursive(&vol, "bundle").unwrap();
        assert!(!root.exists());
    }

    #[test]
    fn deletes_deep_tree() {
        let (tmp, vol) = volume();
        let deep = tmp.path().join("a/b/c");
        std::fs::create_dir_all(&deep).unwrap();
        std::fs::write(deep.join("leaf.txt"), b"leaf").unwrap();
        std::fs::write(tmp.path().join("a/top.txt"), b"top").unwrap();

        delete_recursive(&vol, "/a").unwrap();
        assert!(!tmp.path().join("a").exists());
    }

    #[test]
    fn missing_path_fails() {
        let (_tmp, vol) = volume();
        assert!(delete_recursive(&vol, "ghost").is_err());
    }

    #[test]
    fn sibling_files_outside_target_survive() {
        let (tmp, vol) = volume();
        std::fs::create_dir(tmp.path().join("gone")).unwrap();
        std::fs::write(tmp.path().join("gone/x.bin"), b"x").unwrap();
        std::fs::write(tmp.path().join("keep.bin"), b"keep").unwrap();

        delete_recursive(&vol, "gone").unwrap();
        assert!(!tmp.path().join("gone").exists());
        assert!(tmp.path().join("keep.bin").exists());
    }
}
