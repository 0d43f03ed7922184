//! Session lifecycle and streaming receiver for DI-718B units.
//!
//! This is the layer a caller drives: [`Di718::connect`] brings a unit from
//! whatever state the previous session left it in (often mid-stream) to a
//! freshly initialized, actively streaming connection; [`Di718::recv_frame`]
//! blocks for one frame and returns calibrated values with an arrival
//! timestamp; [`Di718::close`] tears the session down best-effort.
//!
//! The unit has no acknowledgment opcode. Every configuration command is
//! verified by reading back its byte-exact echo: length and content
//! equality *is* the acknowledgment.

pub mod config;
pub mod device;
pub mod discover;
pub mod error;
mod signal;

pub use config::ScanConfig;
pub use device::{Di718, DEFAULT_PORT};
pub use discover::autodiscover;
pub use error::{DeviceError, Result};
