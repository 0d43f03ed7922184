mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(
    name = "di718",
    version,
    about = "Streaming client for DATAQ DI-718B lab data acquisition units"
)]
struct Cli {
    /// Row output format (stdout).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    format: OutputFormat,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Help and version requests are not usage errors.
            let code = match err.kind() {
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                    exit::SUCCESS
                }
                _ => exit::USAGE,
            };
            let _ = err.print();
            std::process::exit(code);
        }
    };
    init_logging(cli.log_format, cli.log_level);

    let result = cmd::run(cli.command, cli.format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_stream_subcommand_with_defaults() {
        let cli = Cli::try_parse_from(["di718", "stream", "di718b"]).expect("should parse");

        match cli.command {
            Command::Stream(args) => {
                assert_eq!(args.host, "di718b");
                assert_eq!(args.port, 10001);
                assert_eq!(args.channels, 6);
                assert_eq!(args.timer_scaler, 2);
                assert_eq!(args.rate_divisor, 0);
                assert_eq!(args.scan_list, "E000E001E002E003E004E005E006E007");
                assert_eq!(args.fullscale, 20.0);
                assert_eq!(args.fudge, 1.0);
                assert!(args.count.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_channel_counts_beyond_the_hardware_maximum() {
        let err = Cli::try_parse_from(["di718", "stream", "di718b", "--channels", "33"])
            .expect_err("33 channels should not parse");
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn parses_discover_subcommand() {
        let cli = Cli::try_parse_from(["di718", "discover"]).expect("should parse");
        assert!(matches!(cli.command, Command::Discover(_)));
    }

    #[test]
    fn parses_json_row_format() {
        let cli = Cli::try_parse_from(["di718", "--format", "json", "stream", "di718b"])
            .expect("should parse");
        assert!(matches!(cli.format, OutputFormat::Json));
    }
}
