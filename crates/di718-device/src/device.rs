use std::io::{ErrorKind, Read, Write};
use std::thread;
use std::time::{Duration, SystemTime};

use di718_frame::{
    channel_count, decode_frame, encode_command, rate_divisor, scan_list, timer_scaler,
    Calibration, BYTES_PER_CHANNEL, START_STREAMING, STOP_SEQUENCE,
};
use di718_transport::{DaqStream, TransportError};
use tracing::{debug, info};

use crate::config::ScanConfig;
use crate::error::{DeviceError, Result};
use crate::signal::SignalWindow;

pub use di718_transport::DEFAULT_PORT;

/// How long the unit needs after a stop command before its transmit buffer
/// stops producing stale stream data.
const QUIESCE_DELAY: Duration = Duration::from_micros(222_222);

/// An open, initialized, actively streaming session with one unit.
///
/// Protocol logic is written against any `Read + Write` stream; the
/// TCP-backed [`DaqStream`] specialization adds connection establishment
/// and teardown. Once [`connect`](Di718::connect) returns, the unit is
/// streaming until [`close`](Di718::close); a handle is never reused after
/// close.
#[derive(Debug)]
pub struct Di718<T = DaqStream> {
    stream: T,
    channels: usize,
    /// Receive scratch, sized once from the validated channel count.
    frame: Vec<u8>,
}

impl<T: Read + Write> Di718<T> {
    /// Wrap an already-streaming transport. `connect` is the normal entry
    /// point; this exists for driving the protocol over other stream types.
    pub fn from_stream(stream: T, channels: usize) -> Self {
        Self {
            stream,
            channels,
            frame: vec![0u8; channels * BYTES_PER_CHANNEL],
        }
    }

    /// Number of channels in every received frame.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Send one ASCII command and verify the unit's echo.
    ///
    /// The unit has no acknowledgment opcode: it echoes the command text
    /// (without the leading null marker), and byte-exact length + content
    /// equality is the acknowledgment.
    pub fn send_command(&mut self, command: &str) -> Result<()> {
        let wire = encode_command(command);
        write_full(&mut self.stream, &wire)?;

        let mut echo = vec![0u8; command.len()];
        read_full(&mut self.stream, &mut echo)?;
        if echo != command.as_bytes() {
            return Err(DeviceError::EchoMismatch {
                sent: command.to_string(),
                received: String::from_utf8_lossy(&echo).into_owned(),
            });
        }

        debug!(command, "command acknowledged");
        Ok(())
    }

    /// Run the acknowledged initialization sequence and start streaming.
    ///
    /// Order matters to the unit; the first failed step aborts with that
    /// step's error.
    pub(crate) fn initialize(&mut self, config: &ScanConfig) -> Result<()> {
        self.send_command(&timer_scaler(config.timer_scaler))?;
        self.send_command(&rate_divisor(config.rate_divisor))?;
        self.send_command(&scan_list(&config.scan_list))?;
        self.send_command(&channel_count(config.channels))?;
        self.send_command(START_STREAMING)?;
        Ok(())
    }

    /// Block for one sample frame; return calibrated values in channel
    /// order and the wall-clock arrival time.
    ///
    /// Termination signals (SIGINT/SIGHUP/SIGTERM) are watched only for the
    /// duration of the blocking read. One observed mid-read is re-raised
    /// for the process-wide disposition and reported as
    /// [`DeviceError::Interrupted`], a shutdown request rather than a fault. A
    /// frame that fails to decode is wholly discarded; the caller decides
    /// whether to keep looping.
    pub fn recv_frame(&mut self, cal: &Calibration) -> Result<(Vec<f32>, SystemTime)> {
        let window = SignalWindow::arm().map_err(TransportError::Io)?;
        let outcome = read_full(&mut self.stream, &mut self.frame);
        if let Some(signal) = window.disarm() {
            return Err(DeviceError::Interrupted { signal });
        }
        let received = SystemTime::now();
        outcome?;

        let values = decode_frame(&self.frame, cal)?;
        Ok((values, received))
    }
}

impl Di718<DaqStream> {
    /// Connect to a unit and bring it to the streaming state.
    ///
    /// The unit may still be streaming on behalf of a previous session, so
    /// the sequence is: fire-and-forget stop, quiesce, drain stale data,
    /// then the acknowledged init sequence. Any failure aborts the whole
    /// connect; there is no partially initialized session.
    pub fn connect(host: &str, port: u16, config: &ScanConfig) -> Result<Self> {
        config.validate()?;

        let mut stream = DaqStream::connect(host, port)?;
        stop_and_quiesce(&mut stream)?;

        let mut device = Self::from_stream(stream, config.channels);
        device.initialize(config)?;

        info!(host, port, channels = config.channels, "unit streaming");
        Ok(device)
    }

    /// Stop streaming and release the connection, best-effort.
    ///
    /// Teardown typically runs during process shutdown or after an error;
    /// failures here are logged and suppressed.
    pub fn close(mut self) {
        if let Err(err) = stop_and_quiesce(&mut self.stream) {
            debug!(%err, "ignoring teardown error");
        }
    }
}

/// Fire-and-forget stop, then wait for the unit to go quiet and discard
/// whatever it already sent. No echo check: a mid-stream unit is not
/// listening for acknowledged commands.
fn stop_and_quiesce(stream: &mut DaqStream) -> Result<()> {
    write_full(stream, &STOP_SEQUENCE)?;
    thread::sleep(QUIESCE_DELAY);
    stream.drain().map_err(DeviceError::from)?;
    Ok(())
}

/// Write all of `bytes`, treating a zero-length write as a closed peer.
fn write_full<T: Write>(stream: &mut T, bytes: &[u8]) -> Result<()> {
    let mut offset = 0usize;
    while offset < bytes.len() {
        match stream.write(&bytes[offset..]) {
            Ok(0) => return Err(DeviceError::Disconnected),
            Ok(n) => offset += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(TransportError::Io(err).into()),
        }
    }
    stream
        .flush()
        .map_err(|err| TransportError::Io(err).into())
}

/// Read exactly `buf.len()` bytes or classify the failure: EOF with nothing
/// read is a closed peer, a timeout with nothing read is an I/O error, and
/// any nonzero short count is a protocol-level partial read.
///
/// A signal that interrupts the read surfaces as an I/O error here; the
/// receive path consults its signal window before interpreting it.
fn read_full<T: Read>(stream: &mut T, buf: &mut [u8]) -> Result<()> {
    let mut filled = 0usize;
    while filled < buf.len() {
        match stream.read(&mut buf[filled..]) {
            Ok(0) => {
                return Err(if filled == 0 {
                    DeviceError::Disconnected
                } else {
                    DeviceError::ShortRead {
                        expected: buf.len(),
                        got: filled,
                    }
                });
            }
            Ok(n) => filled += n,
            Err(err) if matches!(err.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                return Err(if filled == 0 {
                    TransportError::Io(err).into()
                } else {
                    DeviceError::ShortRead {
                        expected: buf.len(),
                        got: filled,
                    }
                });
            }
            Err(err) => return Err(TransportError::Io(err).into()),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    /// Read side replays a script; write side records everything sent.
    struct ScriptedStream {
        input: Cursor<Vec<u8>>,
        output: Vec<u8>,
    }

    impl ScriptedStream {
        fn new(input: impl Into<Vec<u8>>) -> Self {
            Self {
                input: Cursor::new(input.into()),
                output: Vec::new(),
            }
        }
    }

    impl Read for ScriptedStream {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            self.input.read(buf)
        }
    }

    impl Write for ScriptedStream {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.output.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn wire_word(value: u16, channel: usize) -> u16 {
        let sync = if channel == 0 { 0x0100 } else { 0x0101 };
        ((value << 2) & 0xFE00) | ((value << 1) & 0x00FE) | sync
    }

    fn frame_bytes(words: &[u16]) -> Vec<u8> {
        words.iter().flat_map(|w| w.to_le_bytes()).collect()
    }

    #[test]
    fn send_command_accepts_exact_echo() {
        let mut device = Di718::from_stream(ScriptedStream::new(*b"X02"), 0);
        device.send_command("X02").unwrap();
        assert_eq!(device.stream.output, b"\0X02");
    }

    #[test]
    fn send_command_rejects_truncated_echo() {
        // A byte-for-byte prefix is still a protocol error; exact length is
        // required.
        let mut device = Di718::from_stream(ScriptedStream::new(*b"M000"), 0);
        let err = device.send_command("M0000").unwrap_err();
        assert!(matches!(
            err,
            DeviceError::ShortRead {
                expected: 5,
                got: 4
            }
        ));
    }

    #[test]
    fn send_command_rejects_corrupted_echo() {
        let mut device = Di718::from_stream(ScriptedStream::new(*b"M0001"), 0);
        let err = device.send_command("M0000").unwrap_err();
        assert!(matches!(err, DeviceError::EchoMismatch { sent, received }
            if sent == "M0000" && received == "M0001"));
    }

    #[test]
    fn send_command_on_silent_stream_is_disconnected() {
        let mut device = Di718::from_stream(ScriptedStream::new(Vec::new()), 0);
        let err = device.send_command("S3").unwrap_err();
        assert!(matches!(err, DeviceError::Disconnected));
    }

    #[test]
    fn zero_length_write_is_disconnected() {
        struct ZeroWriter;
        impl Read for ZeroWriter {
            fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
                Ok(0)
            }
        }
        impl Write for ZeroWriter {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Ok(0)
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let mut device = Di718::from_stream(ZeroWriter, 0);
        let err = device.send_command("S3").unwrap_err();
        assert!(matches!(err, DeviceError::Disconnected));
    }

    #[test]
    fn initialize_sends_sequence_in_order() {
        let config = ScanConfig {
            timer_scaler: 2,
            rate_divisor: 0,
            scan_list: "E000E001".to_string(),
            channels: 2,
        };
        let echoes = b"X02M0000L00E000E001C02S3".to_vec();
        let mut device = Di718::from_stream(ScriptedStream::new(echoes), config.channels);

        device.initialize(&config).unwrap();
        assert_eq!(
            device.stream.output,
            b"\0X02\0M0000\0L00E000E001\0C02\0S3"
        );
    }

    #[test]
    fn recv_frame_decodes_calibrated_values() {
        let words = [wire_word(1 << 13, 0), wire_word(0, 1)];
        let mut device = Di718::from_stream(ScriptedStream::new(frame_bytes(&words)), 2);

        let before = SystemTime::now();
        let (values, received) = device.recv_frame(&Calibration::default()).unwrap();
        assert_eq!(values.len(), 2);
        assert_eq!(values[0], 0.0);
        assert_eq!(values[1], -20.0);
        assert!(received >= before);
    }

    #[test]
    fn recv_frame_on_closed_stream_is_disconnected() {
        let mut device = Di718::from_stream(ScriptedStream::new(Vec::new()), 2);
        let err = device.recv_frame(&Calibration::default()).unwrap_err();
        assert!(matches!(err, DeviceError::Disconnected));
    }

    #[test]
    fn recv_frame_on_partial_frame_is_short_read() {
        // Three of the four expected bytes, then EOF.
        let words = [wire_word(100, 0)];
        let mut bytes = frame_bytes(&words);
        bytes.push(0x01);
        let mut device = Di718::from_stream(ScriptedStream::new(bytes), 2);

        let err = device.recv_frame(&Calibration::default()).unwrap_err();
        assert!(matches!(
            err,
            DeviceError::ShortRead {
                expected: 4,
                got: 3
            }
        ));
    }

    #[test]
    fn recv_frame_reports_failing_channel_on_sync_loss() {
        let mut words: Vec<u16> = (0..6).map(|c| wire_word(0x2000, c)).collect();
        words[3] &= !0x0100; // continuation flag dropped at channel 3
        let mut device = Di718::from_stream(ScriptedStream::new(frame_bytes(&words)), 6);

        let err = device.recv_frame(&Calibration::default()).unwrap_err();
        assert!(matches!(
            err,
            DeviceError::Frame(di718_frame::FrameError::SyncMismatch { channel: 3, .. })
        ));
    }

    #[test]
    fn recv_frame_timeout_with_nothing_read_is_transport_error() {
        struct TimedOutReader;
        impl Read for TimedOutReader {
            fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::from(ErrorKind::WouldBlock))
            }
        }
        impl Write for TimedOutReader {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                Ok(buf.len())
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let mut device = Di718::from_stream(TimedOutReader, 2);
        let err = device.recv_frame(&Calibration::default()).unwrap_err();
        assert!(matches!(
            err,
            DeviceError::Transport(TransportError::Io(_))
        ));
    }

    #[test]
    fn recv_frame_timeout_after_partial_data_is_short_read() {
        struct PartialThenTimeout {
            sent: bool,
        }
        impl Read for PartialThenTimeout {
            fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
                if self.sent {
                    return Err(std::io::Error::from(ErrorKind::TimedOut));
                }
                self.sent = true;
                buf[0] = 0x20;
                Ok(1)
            }
        }
        impl Write for PartialThenTimeout {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                Ok(buf.len())
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let mut device = Di718::from_stream(PartialThenTimeout { sent: false }, 2);
        let err = device.recv_frame(&Calibration::default()).unwrap_err();
        assert!(matches!(
            err,
            DeviceError::ShortRead {
                expected: 4,
                got: 1
            }
        ));
    }
}
