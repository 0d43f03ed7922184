use std::time::{SystemTime, UNIX_EPOCH};

use clap::ValueEnum;
use serde::Serialize;

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    /// One row per frame: `<secs>.<usecs> <v0> <v1> ...`, values to 3
    /// decimals.
    Text,
    /// One JSON object per line.
    Json,
}

#[derive(Serialize)]
struct RowOutput<'a> {
    timestamp: String,
    values: &'a [f32],
}

pub fn print_row(at: SystemTime, values: &[f32], format: OutputFormat) {
    match format {
        OutputFormat::Text => println!("{}", format_row(at, values)),
        OutputFormat::Json => {
            let out = RowOutput {
                timestamp: format_timestamp(at),
                values,
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
    }
}

fn format_row(at: SystemTime, values: &[f32]) -> String {
    let mut row = format_timestamp(at);
    for value in values {
        row.push_str(&format!(" {value:.3}"));
    }
    row
}

fn format_timestamp(at: SystemTime) -> String {
    let since_epoch = at.duration_since(UNIX_EPOCH).unwrap_or_default();
    format!("{}.{:06}", since_epoch.as_secs(), since_epoch.subsec_micros())
}
