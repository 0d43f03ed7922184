/// Errors that can occur while decoding the sample stream.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// A sample word carried the wrong sync flags for its channel position.
    ///
    /// The raw word is kept for diagnostics; the unit never re-synchronizes
    /// mid-word, so the whole frame is unreliable.
    #[error("sync mismatch at channel {channel}: word {word:#06X}")]
    SyncMismatch { channel: usize, word: u16 },

    /// The byte block is not a whole number of 16-bit words.
    #[error("frame block of {len} bytes is not a whole number of words")]
    TruncatedBlock { len: usize },
}

pub type Result<T> = std::result::Result<T, FrameError>;
