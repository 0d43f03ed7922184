use di718_frame::FrameError;
use di718_transport::TransportError;

/// Errors that can occur in device session operations.
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    /// The scan configuration is invalid; reported before the network is
    /// touched.
    #[error("scan configuration requests {requested} channels, maximum is {max}")]
    Config { requested: usize, max: usize },

    /// Transport-level error (resolution, connect, socket I/O).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Sample-stream decode error.
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),

    /// The unit closed the connection.
    #[error("unit closed the connection")]
    Disconnected,

    /// A read completed with the wrong number of bytes: a partial frame or
    /// a truncated echo.
    #[error("expected {expected} bytes, read {got}")]
    ShortRead { expected: usize, got: usize },

    /// The unit's echo did not match the command byte-for-byte.
    #[error("command echo mismatch: sent {sent:?}, received {received:?}")]
    EchoMismatch { sent: String, received: String },

    /// A termination signal arrived during a blocking receive. The signal
    /// has already been re-raised for the process-wide disposition; callers
    /// treat this as a shutdown request, not a fault.
    #[error("interrupted by signal {signal} during receive")]
    Interrupted { signal: i32 },
}

pub type Result<T> = std::result::Result<T, DeviceError>;
