//! Streaming file I/O with bounded memory.
//!
//! A [`FileChannel`] is an owned, exclusive handle to one open file on a
//! [`Volume`](sdstream_storage::Volume); the chunked-transfer functions move
//! whole files through a single fixed-size buffer so peak memory stays
//! O(buffer), not O(file). All operations are synchronous and block until
//! the underlying medium responds.

mod channel;
mod chunked;
mod types;

pub use channel::FileChannel;
pub use chunked::{
    append_file, append_file_stream, copy_file, process_file, read_file, write_file,
    write_file_stream,
};
pub use types::{ChannelMode, Produced, TransferOutcome, TransferStatus};

use sdstream_storage::StorageError;

/// Default transfer buffer size: 4 KiB per read/write cycle.
///
/// Passing a buffer size of 0 to any transfer function selects this value.
pub const DEFAULT_BUFFER_SIZE: usize = 4096;

/// Errors produced by the transfer crate.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("channel is closed")]
    Closed,

    #[error("read error on {path} at offset {offset}: {source}")]
    Read {
        path: String,
        offset: u64,
        #[source]
        source: std::io::Error,
    },

    #[error("write error on {path}: wrote {written} of {expected} bytes: {source}")]
    Write {
        path: String,
        written: u64,
        expected: u64,
        #[source]
        source: std::io::Error,
    },

    #[error("seek error on {path}: {source}")]
    Seek {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("incomplete transfer of {path}: {transferred} of {expected} bytes")]
    Incomplete {
        path: String,
        transferred: u64,
        expected: u64,
    },
}
