use bytes::Buf;

use crate::error::{FrameError, Result};

/// Maximum number of channels a scan configuration may request.
pub const MAX_CHANNELS: usize = 32;

/// Size of one channel's sample word on the wire.
pub const BYTES_PER_CHANNEL: usize = 2;

/// Mask selecting the two per-word sync flags (bits 8 and 0).
const SYNC_MASK: u16 = 0x0101;
/// Sync pattern marking the first channel of a frame.
const SYNC_FIRST: u16 = 0x0100;
/// Sync pattern on every subsequent channel.
const SYNC_REST: u16 = 0x0101;

/// Mid-scale of the 14-bit measurement range; raw values are centered here.
const MID_SCALE: f32 = (1 << 13) as f32;

/// Conversion from raw counts to engineering units.
///
/// `fullscale` depends on the installed input amplifier module; `fudge` is
/// an empirical multiplier correcting systematic bias against the vendor
/// software's readings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    pub fullscale: f32,
    pub fudge: f32,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            fullscale: 20.0,
            fudge: 1.0,
        }
    }
}

/// Validate a sample word's sync flags and extract its 14-bit measurement.
///
/// `channel` is the word's position within the frame; channel 0 must carry
/// the frame-start sync pattern, all others the continuation pattern. A
/// mismatch means the stream is misaligned and the whole frame must be
/// discarded.
pub fn decode_word(word: u16, channel: usize) -> Result<u16> {
    let expected = if channel == 0 { SYNC_FIRST } else { SYNC_REST };
    if word & SYNC_MASK != expected {
        return Err(FrameError::SyncMismatch { channel, word });
    }
    Ok(((word & 0xFE00) >> 2) | ((word & 0x00FE) >> 1))
}

/// Scale a 14-bit measurement to engineering units.
///
/// Mid-scale maps to 0.0, zero counts to `-fullscale * fudge`.
pub fn calibrate(value: u16, cal: &Calibration) -> f32 {
    cal.fudge * cal.fullscale * (f32::from(value) / MID_SCALE - 1.0)
}

/// Decode one frame (a contiguous block of little-endian sample words)
/// into calibrated values, one per channel in channel order.
///
/// The first sync mismatch aborts the whole frame; no partial output is
/// returned.
pub fn decode_frame(block: &[u8], cal: &Calibration) -> Result<Vec<f32>> {
    if block.len() % BYTES_PER_CHANNEL != 0 {
        return Err(FrameError::TruncatedBlock { len: block.len() });
    }

    let mut words = block;
    let mut values = Vec::with_capacity(block.len() / BYTES_PER_CHANNEL);
    let mut channel = 0usize;
    while words.has_remaining() {
        let raw = decode_word(words.get_u16_le(), channel)?;
        values.push(calibrate(raw, cal));
        channel += 1;
    }
    Ok(values)
}
