use sdstream_sizefmt::format_size;
use sdstream_storage::{StorageBackend, Volume};

use crate::channel::FileChannel;
use crate::types::{Produced, TransferOutcome, TransferStatus};
use crate::{StreamError, DEFAULT_BUFFER_SIZE};

/// Whole-file reads above this size get a warning pointing at the
/// streaming API.
const LARGE_READ_WARN: u64 = 1024 * 1024;

fn effective(buffer_size: usize) -> usize {
    if buffer_size == 0 {
        DEFAULT_BUFFER_SIZE
    } else {
        buffer_size
    }
}

/// Streams the file at `path` through one `buffer_size` buffer.
///
/// `on_chunk` receives `(chunk, total_file_size, bytes_before_this_chunk)`
/// and returns `true` to continue. A zero-length file completes without
/// invoking the callback. If the file yields fewer bytes than its size
/// recorded at open (and the callback never stopped the transfer), the
/// call fails with [`StreamError::Incomplete`].
pub fn process_file<B, C>(
    volume: &Volume<B>,
    path: &str,
    mut on_chunk: C,
    buffer_size: usize,
) -> Result<TransferOutcome, StreamError>
where
    B: StorageBackend,
    C: FnMut(&[u8], u64, u64) -> bool,
{
    let mut channel = FileChannel::open_read(volume, path)?;
    let total = channel.size();
    let buffer_size = effective(buffer_size);
    let mut buffer = vec![0u8; buffer_size];
    let mut transferred: u64 = 0;

    tracing::debug!(
        path,
        size = %format_size(total),
        buffer = %format_size(buffer_size as u64),
        "processing file"
    );

    loop {
        let n = channel.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        let keep_going = on_chunk(&buffer[..n], total, transferred);
        transferred += n as u64;
        if !keep_going {
            tracing::warn!(path, transferred, "chunk callback requested early termination");
            return Ok(TransferOutcome {
                bytes: transferred,
                status: TransferStatus::Stopped,
            });
        }
    }

    if transferred != total {
        return Err(StreamError::Incomplete {
            path: path.to_string(),
            transferred,
            expected: total,
        });
    }
    Ok(TransferOutcome {
        bytes: transferred,
        status: TransferStatus::Completed,
    })
}

/// Streams producer output into `path`, truncating any existing file.
///
/// `producer` fills the buffer it is handed and reports the result as a
/// [`Produced`] value. A chunk shorter than the buffer ends the stream
/// after being written; [`Produced::EndOfStream`] or an empty chunk ends
/// it without a write. A partial write to the medium is always fatal.
pub fn write_file_stream<B, P>(
    volume: &Volume<B>,
    path: &str,
    producer: P,
    buffer_size: usize,
) -> Result<TransferOutcome, StreamError>
where
    B: StorageBackend,
    P: FnMut(&mut [u8]) -> Produced,
{
    stream_to_file(volume, path, false, producer, buffer_size)
}

/// Like [`write_file_stream`], but appends to any existing content.
pub fn append_file_stream<B, P>(
    volume: &Volume<B>,
    path: &str,
    producer: P,
    buffer_size: usize,
) -> Result<TransferOutcome, StreamError>
where
    B: StorageBackend,
    P: FnMut(&mut [u8]) -> Produced,
{
    stream_to_file(volume, path, true, producer, buffer_size)
}

fn stream_to_file<B, P>(
    volume: &Volume<B>,
    path: &str,
    append: bool,
    mut produce: P,
    buffer_size: usize,
) -> Result<TransferOutcome, StreamError>
where
    B: StorageBackend,
    P: FnMut(&mut [u8]) -> Produced,
{
    let mut channel = FileChannel::open_write(volume, path, append)?;
    let buffer_size = effective(buffer_size);
    let mut buffer = vec![0u8; buffer_size];
    let mut total: u64 = 0;

    tracing::debug!(
        path,
        append,
        buffer = %format_size(buffer_size as u64),
        "writing file stream"
    );

    loop {
        match produce(&mut buffer) {
            Produced::EndOfStream | Produced::Data(0) => break,
            Produced::Data(n) => {
                debug_assert!(n <= buffer.len(), "producer reported more than it was given");
                let n = n.min(buffer.len());
                channel.write(&buffer[..n])?;
                total += n as u64;
                // A short chunk is the producer's end-of-stream signal.
                if n < buffer.len() {
                    break;
                }
            }
        }
    }

    tracing::debug!(path, total = %format_size(total), "finished writing file stream");
    Ok(TransferOutcome {
        bytes: total,
        status: TransferStatus::Completed,
    })
}

/// Reads the whole file at `path` into memory.
///
/// Prefer [`process_file`] for anything large; reads above 1 MiB warn.
pub fn read_file<B: StorageBackend>(volume: &Volume<B>, path: &str) -> Result<Vec<u8>, StreamError> {
    let mut content = Vec::new();
    process_file(
        volume,
        path,
        |chunk, total, transferred| {
            if transferred == 0 {
                if total > LARGE_READ_WARN {
                    tracing::warn!(
                        path,
                        size = %format_size(total),
                        "reading large file into memory, consider process_file"
                    );
                }
                content.reserve(total as usize);
            }
            content.extend_from_slice(chunk);
            true
        },
        0,
    )?;
    Ok(content)
}

/// Writes `data` to `path` in one shot, truncating any existing file.
pub fn write_file<B: StorageBackend>(
    volume: &Volume<B>,
    path: &str,
    data: &[u8],
) -> Result<(), StreamError> {
    tracing::trace!(path, len = data.len(), "writing file");
    let mut channel = FileChannel::open_write(volume, path, false)?;
    channel.write(data)?;
    Ok(())
}

/// Appends `data` to `path`, creating the file if absent.
pub fn append_file<B: StorageBackend>(
    volume: &Volume<B>,
    path: &str,
    data: &[u8],
) -> Result<(), StreamError> {
    tracing::trace!(path, len = data.len(), "appending to file");
    let mut channel = FileChannel::open_write(volume, path, true)?;
    channel.write(data)?;
    Ok(())
}

/// Copies `src` to `dst` through one bounded buffer.
///
/// Returns the number of bytes copied.
pub fn copy_file<B: StorageBackend>(
    volume: &Volume<B>,
    src: &str,
    dst: &str,
    buffer_size: usize,
) -> Result<u64, StreamError> {
    let mut reader = FileChannel::open_read(volume, src)?;
    let mut writer = FileChannel::open_write(volume, dst, false)?;
    let mut buffer = vec![0u8; effective(buffer_size)];
    let mut copied: u64 = 0;

    loop {
        let n = reader.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        writer.write(&buffer[..n])?;
        copied += n as u64;
    }

    if copied != reader.size() {
        return Err(StreamError::Incomplete {
            path: src.to_string(),
            transferred: copied,
            expected: reader.size(),
        });
    }
    tracing::debug!(src, dst, copied = %format_size(copied), "copied file");
    Ok(copied)
}
