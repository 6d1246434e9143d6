//! Host filesystem backend.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

use crate::backend::{EntryInfo, Metadata, StorageBackend};

/// [`StorageBackend`] over the operating system's filesystem.
///
/// This is the default backend; embedded targets substitute their own
/// implementation at configuration time.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdFs;

impl StorageBackend for StdFs {
    type File = File;

    fn open_read(&self, path: &Path) -> io::Result<File> {
        File::open(path)
    }

    fn open_write(&self, path: &Path, append: bool) -> io::Result<File> {
        let mut opts = OpenOptions::new();
        opts.write(true).create(true);
        if append {
            opts.append(true);
        } else {
            opts.truncate(true);
        }
        opts.open(path)
    }

    fn metadata(&self, path: &Path) -> io::Result<Metadata> {
        let meta = std::fs::metadata(path)?;
        Ok(Metadata {
            size: meta.len(),
            is_dir: meta.is_dir(),
        })
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<EntryInfo>> {
        // std::fs::read_dir already excludes `.` and `..`.
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(path)? {
            let entry = entry?;
            let is_dir = entry.file_type()?.is_dir();
            entries.push(EntryInfo {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_dir,
            });
        }
        Ok(entries)
    }

    fn create_dir(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir(path)
    }

    fn remove_dir(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_dir(path)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Seek, SeekFrom, Write};

    #[test]
    fn open_write_truncates() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("out.bin");

        let mut f = StdFs.open_write(&path, false).unwrap();
        f.write_all(b"first version").unwrap();
        drop(f);

        let mut f = StdFs.open_write(&path, false).unwrap();
        f.write_all(b"second").unwrap();
        drop(f);

        assert_eq!(std::fs::read(&path).unwrap(), b"second");
    }

    #[test]
    fn open_write_append_keeps_content() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("log.txt");

        let mut f = StdFs.open_write(&path, false).unwrap();
        f.write_all(b"one,").unwrap();
        drop(f);

        let mut f = StdFs.open_write(&path, true).unwrap();
        f.write_all(b"two").unwrap();
        drop(f);

        assert_eq!(std::fs::read(&path).unwrap(), b"one,two");
    }

    #[test]
    fn metadata_reports_size_and_kind() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("data.bin");
        std::fs::write(&file, b"12345").unwrap();

        let meta = StdFs.metadata(&file).unwrap();
        assert_eq!(meta.size, 5);
        assert!(!meta.is_dir);

        let meta = StdFs.metadata(tmp.path()).unwrap();
        assert!(meta.is_dir);
    }

    #[test]
    fn metadata_missing_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let err = StdFs.metadata(&tmp.path().join("ghost")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn read_dir_classifies_inline() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir(tmp.path().join("sub")).unwrap();
        std::fs::write(tmp.path().join("file.txt"), b"x").unwrap();

        let mut entries = StdFs.read_dir(tmp.path()).unwrap();
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "file.txt");
        assert!(!entries[0].is_dir);
        assert_eq!(entries[1].name, "sub");
        assert!(entries[1].is_dir);
    }

    #[test]
    fn space_is_unsupported() {
        let err = StdFs.space().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Unsupported);
    }

    #[test]
    fn raw_file_seek_and_read() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("seek.bin");
        std::fs::write(&path, b"0123456789").unwrap();

        let mut f = StdFs.open_read(&path).unwrap();
        f.seek(SeekFrom::Start(6)).unwrap();
        let mut buf = [0u8; 4];
        f.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"6789");
    }
}
