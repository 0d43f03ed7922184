use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use di718_device::{DeviceError, Di718, ScanConfig};
use di718_frame::Calibration;
use tracing::{debug, warn};

use crate::cmd::StreamArgs;
use crate::exit::{device_error, CliError, CliResult, SOFTWARE, SUCCESS};
use crate::output::{print_row, OutputFormat};

pub fn run(args: StreamArgs, format: OutputFormat) -> CliResult<i32> {
    let config = ScanConfig {
        timer_scaler: args.timer_scaler,
        rate_divisor: args.rate_divisor,
        scan_list: args.scan_list.clone(),
        channels: usize::from(args.channels),
    };
    let cal = Calibration {
        fullscale: args.fullscale,
        fudge: args.fudge,
    };

    let mut device = Di718::connect(&args.host, args.port, &config)
        .map_err(|err| device_error("connect failed", err))?;

    // Covers signals that land between receive calls; signals during a
    // receive are observed by the driver's own scoped window and re-raised
    // into this handler.
    let running = Arc::new(AtomicBool::new(true));
    install_shutdown_handler(Arc::clone(&running))?;

    let mut printed = 0usize;
    while running.load(Ordering::SeqCst) {
        match device.recv_frame(&cal) {
            Ok((values, timestamp)) => {
                print_row(timestamp, &values, format);
                printed = printed.saturating_add(1);
                if args.count.is_some_and(|count| printed >= count) {
                    break;
                }
            }
            Err(DeviceError::Interrupted { signal }) => {
                debug!(signal, "shutdown requested during receive");
                break;
            }
            Err(err @ DeviceError::Disconnected) => {
                device.close();
                return Err(device_error("stream ended", err));
            }
            // A single bad frame is not fatal; the unit keeps streaming and
            // the next read resumes at a frame boundary.
            Err(err) => warn!(%err, "skipping unreadable frame"),
        }
    }

    device.close();
    Ok(SUCCESS)
}

fn install_shutdown_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| CliError::new(SOFTWARE, format!("signal handler setup failed: {err}")))
}
