//! Wire codec for the DI-718B command and sample-stream formats.
//!
//! Two formats share the connection:
//!
//! - **Commands** are ASCII, transmitted as `{0x00}{text}`. The null byte is
//!   the unit's out-of-band command marker; the echo the unit sends back
//!   omits it.
//! - **Sample frames** are one little-endian 16-bit word per channel:
//!
//! ```text
//! bit 15                                    0
//!     ┌───────────────┬─┬───────────────┬─┐
//!     │ value[13:7]   │S│ value[6:0]    │S│
//!     └───────────────┴─┴───────────────┴─┘
//! ```
//!
//! Bits 8 and 0 are sync flags: `0x0100` on the first channel of a frame,
//! `0x0101` on every other channel. They are the unit's only structural
//! self-consistency check, so a mismatch condemns the whole frame.

pub mod command;
pub mod error;
pub mod sample;

pub use command::{
    channel_count, encode_command, rate_divisor, scan_list, timer_scaler, COMMAND_MARKER,
    START_STREAMING, STOP_SEQUENCE,
};
pub use error::{FrameError, Result};
pub use sample::{
    calibrate, decode_frame, decode_word, Calibration, BYTES_PER_CHANNEL, MAX_CHANNELS,
};
