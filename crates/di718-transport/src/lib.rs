//! TCP transport to DATAQ DI-718B data acquisition units.
//!
//! The unit is a TCP server on its serial-bridge port (10001 by default);
//! this crate is the client side. It owns the pieces an operator cares
//! about when a connection fails: hostname resolution (reported distinctly,
//! because "no such host" usually means the unit is unplugged), the blocking
//! connect, and the 1 second read/write timeouts that keep the driver from
//! hanging when the unit goes silent mid-stream.
//!
//! This is the lowest layer of di718. Everything else builds on top of the
//! [`DaqStream`] type provided here.

pub mod error;
pub mod tcp;

pub use error::{Result, TransportError};
pub use tcp::{resolve, DaqStream, DEFAULT_PORT, IO_TIMEOUT};
