use std::io::{self, ErrorKind, SeekFrom};

use sdstream_sizefmt::format_size;
use sdstream_storage::{RawFile, StorageBackend, StorageError, Volume};

use crate::types::ChannelMode;
use crate::StreamError;

/// An owned, exclusive handle to one open file.
///
/// A channel is either open (owning exactly one backend descriptor) or
/// closed; there is never a second logical owner. The descriptor is
/// released by [`close`](Self::close) or, failing that, by `Drop`, so every
/// exit path — normal return, early return, `?`-propagation — releases it.
#[derive(Debug)]
pub struct FileChannel<F: RawFile> {
    file: Option<F>,
    path: String,
    mode: ChannelMode,
    /// File size recorded once at open (read mode only).
    size: u64,
    pos: u64,
    at_eof: bool,
}

impl<F: RawFile> FileChannel<F> {
    /// Opens `path` on `volume` for reading.
    ///
    /// The file size is determined once here and never re-queried.
    pub fn open_read<B>(volume: &Volume<B>, path: &str) -> Result<Self, StreamError>
    where
        B: StorageBackend<File = F>,
    {
        let abs = volume.resolve(path)?;
        let meta = volume
            .backend()
            .metadata(&abs)
            .map_err(|source| StorageError::Open {
                path: path.to_string(),
                source,
            })?;
        if meta.is_dir {
            return Err(StorageError::IsADirectory(path.to_string()).into());
        }
        let file = volume
            .backend()
            .open_read(&abs)
            .map_err(|source| StorageError::Open {
                path: path.to_string(),
                source,
            })?;

        tracing::trace!(path, size = %format_size(meta.size), "opened file for reading");
        Ok(Self {
            file: Some(file),
            path: path.to_string(),
            mode: ChannelMode::Read,
            size: meta.size,
            pos: 0,
            at_eof: false,
        })
    }

    /// Opens `path` on `volume` for writing, creating it if absent.
    ///
    /// Truncates unless `append` is set.
    pub fn open_write<B>(volume: &Volume<B>, path: &str, append: bool) -> Result<Self, StreamError>
    where
        B: StorageBackend<File = F>,
    {
        let abs = volume.resolve(path)?;
        let file = volume
            .backend()
            .open_write(&abs, append)
            .map_err(|source| StorageError::Open {
                path: path.to_string(),
                source,
            })?;

        tracing::trace!(path, append, "opened file for writing");
        Ok(Self {
            file: Some(file),
            path: path.to_string(),
            mode: ChannelMode::Write { append },
            size: 0,
            pos: 0,
            at_eof: false,
        })
    }

    /// Reads up to `buf.len()` bytes.
    ///
    /// Returns fewer than requested only at end-of-file; an underlying
    /// error surfaces as [`StreamError::Read`] with the offset reached.
    /// Returns 0 once the end is reached.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize, StreamError> {
        let file = self.file.as_mut().ok_or(StreamError::Closed)?;
        let mut filled = 0;
        while filled < buf.len() {
            match file.read(&mut buf[filled..]) {
                Ok(0) => {
                    self.at_eof = true;
                    break;
                }
                Ok(n) => {
                    filled += n;
                    self.pos += n as u64;
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(source) => {
                    return Err(StreamError::Read {
                        path: self.path.clone(),
                        offset: self.pos,
                        source,
                    });
                }
            }
        }
        Ok(filled)
    }

    /// Writes the whole of `buf`.
    ///
    /// A short write is never reported as success: if the medium takes
    /// fewer bytes, the call fails with the written/expected counts.
    pub fn write(&mut self, buf: &[u8]) -> Result<usize, StreamError> {
        let file = self.file.as_mut().ok_or(StreamError::Closed)?;
        let mut written = 0;
        while written < buf.len() {
            match file.write(&buf[written..]) {
                Ok(0) => {
                    return Err(StreamError::Write {
                        path: self.path.clone(),
                        written: written as u64,
                        expected: buf.len() as u64,
                        source: io::Error::new(ErrorKind::WriteZero, "medium accepted no bytes"),
                    });
                }
                Ok(n) => {
                    written += n;
                    self.pos += n as u64;
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(source) => {
                    return Err(StreamError::Write {
                        path: self.path.clone(),
                        written: written as u64,
                        expected: buf.len() as u64,
                        source,
                    });
                }
            }
        }
        Ok(written)
    }

    /// Seeks to an absolute position.
    pub fn seek(&mut self, position: u64) -> Result<(), StreamError> {
        let file = self.file.as_mut().ok_or(StreamError::Closed)?;
        file.seek(SeekFrom::Start(position))
            .map_err(|source| StreamError::Seek {
                path: self.path.clone(),
                source,
            })?;
        self.pos = position;
        self.at_eof = false;
        Ok(())
    }

    /// Current position, tracked by the channel.
    pub fn tell(&self) -> u64 {
        self.pos
    }

    /// File size recorded at open time. 0 for write channels.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// True once closed, or once a read channel has reached the end.
    pub fn eof(&self) -> bool {
        if self.file.is_none() {
            return true;
        }
        self.mode == ChannelMode::Read && (self.at_eof || self.pos >= self.size)
    }

    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    pub fn mode(&self) -> ChannelMode {
        self.mode
    }

    /// Path this channel was opened with (volume-relative).
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Releases the descriptor. Safe to call more than once.
    pub fn close(&mut self) {
        if let Some(file) = self.file.take() {
            drop(file);
            tracing::trace!(path = %self.path, "closed file");
        }
    }
}

impl<F: RawFile> Drop for FileChannel<F> {
    fn drop(&mut self) {
        self.close();
    }
}
