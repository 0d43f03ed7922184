use di718_frame::MAX_CHANNELS;

use crate::error::{DeviceError, Result};

/// Immutable scan parameters for one acquisition session.
///
/// `timer_scaler` and `rate_divisor` divide the unit's 14400 Hz master
/// timer down to the output sample rate. `scan_list` is the unit's
/// hex-coded list of physical channels and modes; its order determines the
/// channel order of every received frame. `channels` selects how many
/// entries of the scan list are actually sampled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    pub timer_scaler: u8,
    pub rate_divisor: u16,
    pub scan_list: String,
    pub channels: usize,
}

impl ScanConfig {
    /// Reject configurations the receive path could not buffer.
    pub fn validate(&self) -> Result<()> {
        if self.channels > MAX_CHANNELS {
            return Err(DeviceError::Config {
                requested: self.channels,
                max: MAX_CHANNELS,
            });
        }
        Ok(())
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            timer_scaler: 2,
            rate_divisor: 0,
            scan_list: "E000E001E002E003E004E005E006E007".to_string(),
            channels: 6,
        }
    }
}
