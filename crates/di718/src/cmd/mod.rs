use clap::{Args, Subcommand};
use di718_device::DEFAULT_PORT;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod discover;
pub mod stream;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Connect to a unit and stream calibrated rows to stdout.
    Stream(StreamArgs),
    /// Look for a unit on the local network.
    Discover(DiscoverArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Stream(args) => stream::run(args, format),
        Command::Discover(args) => discover::run(args),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct StreamArgs {
    /// Hostname or IP address of the unit.
    pub host: String,
    /// TCP port of the unit's serial bridge.
    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,
    /// Number of scan-list channels to sample.
    #[arg(long, default_value_t = 6, value_parser = clap::value_parser!(u8).range(1..=32))]
    pub channels: u8,
    /// Division from the unit's main 14400 Hz timer.
    #[arg(long, default_value_t = 2)]
    pub timer_scaler: u8,
    /// Further division on the output rate.
    #[arg(long, default_value_t = 0)]
    pub rate_divisor: u16,
    /// Hex-coded scan list; order determines channel order.
    #[arg(long, default_value = "E000E001E002E003E004E005E006E007")]
    pub scan_list: String,
    /// Full-scale engineering-unit range of the installed amplifier module.
    #[arg(long, default_value_t = 20.0)]
    pub fullscale: f32,
    /// Empirical calibration multiplier.
    #[arg(long, default_value_t = 1.0)]
    pub fudge: f32,
    /// Exit after printing N rows.
    #[arg(long)]
    pub count: Option<usize>,
}

#[derive(Args, Debug, Default)]
pub struct DiscoverArgs {}

#[derive(Args, Debug, Default)]
pub struct VersionArgs {}
