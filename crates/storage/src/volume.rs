use std::path::{Component, Path, PathBuf};

use crate::backend::{Metadata, SpaceInfo, StorageBackend};
use crate::std_fs::StdFs;
use crate::StorageError;

/// A mounted storage namespace with an explicit root.
///
/// Every operation takes a volume-relative path string; a leading `/` means
/// the volume root, so `"/logs/boot.txt"` and `"logs/boot.txt"` name the
/// same file. The root is carried per instance rather than baked into a
/// global mount point, so multiple volumes and test backends can coexist.
pub struct Volume<B: StorageBackend = StdFs> {
    root: PathBuf,
    backend: B,
}

impl Volume<StdFs> {
    /// Creates a volume over the host filesystem rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_backend(root, StdFs)
    }
}

impl<B: StorageBackend> Volume<B> {
    /// Creates a volume over an explicit backend rooted at `root`.
    pub fn with_backend(root: impl Into<PathBuf>, backend: B) -> Self {
        Self {
            root: root.into(),
            backend,
        }
    }

    /// The volume root on the backend.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Resolves a volume-relative path onto the root.
    ///
    /// Rejects parent-directory traversal and platform path prefixes; an
    /// empty path or `"/"` resolves to the root itself.
    pub fn resolve(&self, path: &str) -> Result<PathBuf, StorageError> {
        let rel = path.trim_start_matches('/');
        for component in Path::new(rel).components() {
            match component {
                Component::ParentDir => {
                    return Err(StorageError::InvalidPath(format!(
                        "parent directory traversal not allowed: {path}"
                    )));
                }
                Component::Prefix(_) | Component::RootDir => {
                    return Err(StorageError::InvalidPath(format!(
                        "path prefix not allowed: {path}"
                    )));
                }
                Component::CurDir | Component::Normal(_) => {}
            }
        }
        Ok(self.root.join(rel))
    }

    /// Whether `path` exists on the volume.
    pub fn exists(&self, path: &str) -> bool {
        self.resolve(path)
            .map(|p| self.backend.metadata(&p).is_ok())
            .unwrap_or(false)
    }

    /// Metadata for `path`. Absence is an error, not a sentinel.
    pub fn metadata(&self, path: &str) -> Result<Metadata, StorageError> {
        let abs = self.resolve(path)?;
        self.backend.metadata(&abs).map_err(|source| StorageError::Io {
            path: path.to_string(),
            source,
        })
    }

    /// Size of the file at `path` in bytes; 0 for directories.
    pub fn file_size(&self, path: &str) -> Result<u64, StorageError> {
        let meta = self.metadata(path)?;
        Ok(if meta.is_dir { 0 } else { meta.size })
    }

    /// Whether `path` is a directory. Missing paths report `false`.
    pub fn is_directory(&self, path: &str) -> bool {
        self.resolve(path)
            .ok()
            .and_then(|p| self.backend.metadata(&p).ok())
            .map(|m| m.is_dir)
            .unwrap_or(false)
    }

    /// Creates a single directory (the parent must exist).
    pub fn create_directory(&self, path: &str) -> Result<(), StorageError> {
        let abs = self.resolve(path)?;
        tracing::trace!(path, "create directory");
        self.backend.create_dir(&abs).map_err(|source| StorageError::Io {
            path: path.to_string(),
            source,
        })
    }

    /// Removes an empty directory. Fails if `path` is not a directory.
    pub fn remove_directory(&self, path: &str) -> Result<(), StorageError> {
        if !self.is_directory(path) {
            return Err(StorageError::NotADirectory(path.to_string()));
        }
        let abs = self.resolve(path)?;
        tracing::trace!(path, "remove directory");
        self.backend.remove_dir(&abs).map_err(|source| StorageError::Io {
            path: path.to_string(),
            source,
        })
    }

    /// Removes the file at `path`. Directories are rejected.
    pub fn delete_file(&self, path: &str) -> Result<(), StorageError> {
        if self.is_directory(path) {
            return Err(StorageError::IsADirectory(path.to_string()));
        }
        let abs = self.resolve(path)?;
        tracing::trace!(path, "delete file");
        self.backend.remove_file(&abs).map_err(|source| StorageError::Io {
            path: path.to_string(),
            source,
        })
    }

    /// Volume-wide capacity, where the backend exposes it.
    pub fn space_info(&self) -> Result<SpaceInfo, StorageError> {
        self.backend.space().map_err(|source| {
            if source.kind() == std::io::ErrorKind::Unsupported {
                StorageError::Unsupported("space accounting")
            } else {
                StorageError::Io {
                    path: self.root.display().to_string(),
                    source,
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    fn volume() -> (tempfile::TempDir, Volume) {
        let tmp = tempfile::tempdir().unwrap();
        let vol = Volume::new(tmp.path());
        (tmp, vol)
    }

    #[test]
    fn resolve_joins_onto_root() {
        let (tmp, vol) = volume();
        assert_eq!(
            vol.resolve("logs/boot.txt").unwrap(),
            tmp.path().join("logs/boot.txt")
        );
        // Leading slash means the volume root, not the host root.
        assert_eq!(
            vol.resolve("/logs/boot.txt").unwrap(),
            tmp.path().join("logs/boot.txt")
        );
    }

    #[test]
    fn resolve_root_aliases() {
        let (tmp, vol) = volume();
        assert_eq!(vol.resolve("").unwrap(), tmp.path());
        assert_eq!(vol.resolve("/").unwrap(), tmp.path());
    }

    #[test]
    fn resolve_rejects_parent_traversal() {
        let (_tmp, vol) = volume();
        assert!(matches!(
            vol.resolve("../escape"),
            Err(StorageError::InvalidPath(_))
        ));
        assert!(matches!(
            vol.resolve("sub/../../escape"),
            Err(StorageError::InvalidPath(_))
        ));
    }

    #[test]
    fn exists_and_is_directory() {
        let (tmp, vol) = volume();
        std::fs::create_dir(tmp.path().join("music")).unwrap();
        std::fs::write(tmp.path().join("music/track.mp3"), b"id3").unwrap();

        assert!(vol.exists("music"));
        assert!(vol.exists("/music/track.mp3"));
        assert!(!vol.exists("video"));

        assert!(vol.is_directory("music"));
        assert!(!vol.is_directory("music/track.mp3"));
        assert!(!vol.is_directory("video"));
    }

    #[test]
    fn file_size_semantics() {
        let (tmp, vol) = volume();
        std::fs::write(tmp.path().join("data.bin"), vec![0u8; 300]).unwrap();
        std::fs::create_dir(tmp.path().join("sub")).unwrap();

        assert_eq!(vol.file_size("data.bin").unwrap(), 300);
        // Directories report zero.
        assert_eq!(vol.file_size("sub").unwrap(), 0);
        // Missing paths are an error, not a zero size.
        assert!(vol.file_size("ghost").is_err());
    }

    #[test]
    fn create_and_remove_directory() {
        let (tmp, vol) = volume();
        vol.create_directory("rec").unwrap();
        assert!(tmp.path().join("rec").is_dir());

        vol.remove_directory("rec").unwrap();
        assert!(!tmp.path().join("rec").exists());
    }

    #[test]
    fn remove_directory_rejects_files() {
        let (tmp, vol) = volume();
        std::fs::write(tmp.path().join("f.txt"), b"x").unwrap();
        assert!(matches!(
            vol.remove_directory("f.txt"),
            Err(StorageError::NotADirectory(_))
        ));
    }

    #[test]
    fn delete_file_rejects_directories() {
        let (tmp, vol) = volume();
        std::fs::create_dir(tmp.path().join("d")).unwrap();
        assert!(matches!(
            vol.delete_file("d"),
            Err(StorageError::IsADirectory(_))
        ));

        std::fs::write(tmp.path().join("f.txt"), b"x").unwrap();
        vol.delete_file("f.txt").unwrap();
        assert!(!tmp.path().join("f.txt").exists());
    }

    #[test]
    fn space_info_unsupported_on_host() {
        let (_tmp, vol) = volume();
        assert!(matches!(
            vol.space_info(),
            Err(StorageError::Unsupported(_))
        ));
    }

    /// Backend wrapper that adds capacity reporting, to exercise the
    /// optional capability path.
    struct SpacedFs(StdFs);

    impl StorageBackend for SpacedFs {
        type File = std::fs::File;

        fn open_read(&self, path: &Path) -> io::Result<Self::File> {
            self.0.open_read(path)
        }
        fn open_write(&self, path: &Path, append: bool) -> io::Result<Self::File> {
            self.0.open_write(path, append)
        }
        fn metadata(&self, path: &Path) -> io::Result<Metadata> {
            self.0.metadata(path)
        }
        fn read_dir(&self, path: &Path) -> io::Result<Vec<crate::EntryInfo>> {
            self.0.read_dir(path)
        }
        fn create_dir(&self, path: &Path) -> io::Result<()> {
            self.0.create_dir(path)
        }
        fn remove_dir(&self, path: &Path) -> io::Result<()> {
            self.0.remove_dir(path)
        }
        fn remove_file(&self, path: &Path) -> io::Result<()> {
            self.0.remove_file(path)
        }
        fn space(&self) -> io::Result<SpaceInfo> {
            Ok(SpaceInfo {
                total: 1024,
                used: 256,
                free: 768,
            })
        }
    }

    #[test]
    fn space_info_passes_through_capable_backends() {
        let tmp = tempfile::tempdir().unwrap();
        let vol = Volume::with_backend(tmp.path(), SpacedFs(StdFs));
        let space = vol.space_info().unwrap();
        assert_eq!(space.total, 1024);
        assert_eq!(space.used + space.free, space.total);
    }
}
