/// Mode of an open channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelMode {
    Read,
    Write { append: bool },
}

/// Terminal classification of a chunked transfer that did not fail.
///
/// Failures (open, I/O, incomplete read) are the `Err` arm of the calling
/// function's `Result` and carry the failing path plus byte counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferStatus {
    /// All data was moved.
    Completed,
    /// The chunk callback asked to stop early.
    Stopped,
}

/// Result of a chunked-transfer call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferOutcome {
    /// Total bytes moved through the buffer.
    pub bytes: u64,
    pub status: TransferStatus,
}

impl TransferOutcome {
    pub fn is_complete(&self) -> bool {
        self.status == TransferStatus::Completed
    }
}

/// What a write-direction producer put into the transfer buffer.
///
/// The tagged form keeps "done" distinct from "short because something went
/// wrong": a producer that is finished says so rather than overloading the
/// byte count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Produced {
    /// `0..=buffer_len` bytes were written at the front of the buffer.
    ///
    /// A chunk shorter than the buffer is the final chunk of the stream;
    /// producers must not return a short, non-final chunk.
    Data(usize),
    /// Nothing more to produce.
    EndOfStream,
}
