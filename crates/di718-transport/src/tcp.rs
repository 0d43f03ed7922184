use std::io::{ErrorKind, Read, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use tracing::{debug, info};

use crate::error::{Result, TransportError};

/// Factory-default port of the unit's serial-to-ethernet bridge.
pub const DEFAULT_PORT: u16 = 10001;

/// Timeout applied to both reads and writes on a connected stream.
///
/// Reads must be bounded so a silent unit cannot hang the driver forever;
/// the same bound is applied to writes so a stalled peer with a full socket
/// buffer cannot either.
pub const IO_TIMEOUT: Duration = Duration::from_secs(1);

/// Resolve a hostname to the address of a unit.
///
/// Resolution failure is a [`TransportError::HostResolution`], not a connect
/// error.
pub fn resolve(host: &str, port: u16) -> Result<SocketAddr> {
    let mut addrs = (host, port)
        .to_socket_addrs()
        .map_err(|source| TransportError::HostResolution {
            host: host.to_string(),
            source,
        })?;
    addrs.next().ok_or_else(|| TransportError::HostResolution {
        host: host.to_string(),
        source: std::io::Error::new(ErrorKind::NotFound, "no addresses returned"),
    })
}

/// A connected, timeout-bounded stream to a unit — implements Read + Write.
#[derive(Debug)]
pub struct DaqStream {
    inner: TcpStream,
    peer: SocketAddr,
}

impl DaqStream {
    /// Resolve `host` and open a blocking TCP connection with [`IO_TIMEOUT`]
    /// applied to reads and writes.
    pub fn connect(host: &str, port: u16) -> Result<Self> {
        let peer = resolve(host, port)?;
        let inner = TcpStream::connect(peer).map_err(|source| TransportError::Connect {
            host: host.to_string(),
            port,
            source,
        })?;
        inner.set_read_timeout(Some(IO_TIMEOUT))?;
        inner.set_write_timeout(Some(IO_TIMEOUT))?;

        info!(%peer, "connected to unit");

        Ok(Self { inner, peer })
    }

    /// Discard whatever is currently readable without blocking.
    ///
    /// Returns the number of bytes thrown away. Used after a stop command to
    /// flush streaming data left over from a previous session.
    pub fn drain(&mut self) -> Result<usize> {
        self.inner.set_nonblocking(true)?;
        let mut discarded = 0usize;
        let mut buf = [0u8; 32];
        let outcome = loop {
            match self.inner.read(&mut buf) {
                Ok(0) => break Ok(()),
                Ok(n) => discarded += n,
                Err(err) if err.kind() == ErrorKind::WouldBlock => break Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => break Err(err),
            }
        };
        // Restore blocking mode even when the read loop failed.
        self.inner.set_nonblocking(false)?;
        outcome?;

        if discarded > 0 {
            debug!(discarded, "drained stale bytes from unit");
        }
        Ok(discarded)
    }

    /// The address this stream is connected to.
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }
}

impl Read for DaqStream {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.inner.read(buf)
    }
}

impl Write for DaqStream {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
