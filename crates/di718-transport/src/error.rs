/// Errors that can occur in transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The hostname did not resolve to an address. To an operator this
    /// usually means the unit is unplugged.
    #[error("hostname {host:?} did not resolve: {source}")]
    HostResolution {
        host: String,
        source: std::io::Error,
    },

    /// Failed to open the TCP connection.
    #[error("failed to connect to {host}:{port}: {source}")]
    Connect {
        host: String,
        port: u16,
        source: std::io::Error,
    },

    /// An I/O error occurred on the connected stream.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TransportError>;
