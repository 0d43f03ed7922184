use bytes::{BufMut, Bytes, BytesMut};

/// Out-of-band marker prefixed to every command sent to the unit.
pub const COMMAND_MARKER: u8 = 0x00;

/// Raw "stop streaming" sequence.
///
/// Sent fire-and-forget, without echo verification: when the unit is
/// mid-stream it is not listening for acknowledged commands yet.
pub const STOP_SEQUENCE: [u8; 3] = [COMMAND_MARKER, b'T', b'0'];

/// Start streaming in mode 3.
pub const START_STREAMING: &str = "S3";

/// Encode a command for the wire: `{0x00}{ASCII text}`.
pub fn encode_command(text: &str) -> Bytes {
    let mut buf = BytesMut::with_capacity(1 + text.len());
    buf.put_u8(COMMAND_MARKER);
    buf.put_slice(text.as_bytes());
    buf.freeze()
}

/// Division from the unit's main 14400 Hz timer.
pub fn timer_scaler(scaler: u8) -> String {
    format!("X{scaler:02X}")
}

/// Further division on the output rate.
pub fn rate_divisor(divisor: u16) -> String {
    format!("M{divisor:04X}")
}

/// Which channels to scan, and options. The `00` option prefix is fixed;
/// the tail is the caller-supplied hex-coded scan list.
pub fn scan_list(list: &str) -> String {
    format!("L00{list}")
}

/// Scan the first `channels` entries of the scan list.
pub fn channel_count(channels: usize) -> String {
    format!("C{channels:02X}")
}
