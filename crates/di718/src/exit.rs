use std::fmt;

use di718_device::DeviceError;
use di718_transport::TransportError;

// Exit codes follow sysexits.h, which the unit's protocol family has always
// been operated against: automation distinguishes "bad host" from "protocol
// desync" from "unplugged" by status alone.
pub const SUCCESS: i32 = 0;
pub const USAGE: i32 = 64;
pub const DATA_INVALID: i32 = 65;
pub const NO_HOST: i32 = 68;
pub const UNAVAILABLE: i32 = 69;
pub const SOFTWARE: i32 = 70;
pub const IO_ERROR: i32 = 74;
pub const PROTOCOL: i32 = 76;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn device_error(context: &str, err: DeviceError) -> CliError {
    let code = match &err {
        DeviceError::Config { .. } => DATA_INVALID,
        DeviceError::Transport(TransportError::HostResolution { .. }) => NO_HOST,
        DeviceError::Transport(TransportError::Connect { .. }) => UNAVAILABLE,
        DeviceError::Transport(TransportError::Io(_)) => IO_ERROR,
        DeviceError::Disconnected | DeviceError::Interrupted { .. } => UNAVAILABLE,
        DeviceError::ShortRead { .. }
        | DeviceError::EchoMismatch { .. }
        | DeviceError::Frame(_) => PROTOCOL,
    };
    CliError::new(code, format!("{context}: {err}"))
}
