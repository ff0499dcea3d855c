//! Command-line arguments
//!
//! `-d` and `-v` are the historical options; the long options configure
//! logging, configuration discovery and the worker. clap's own help and
//! version flags are disabled: any parse failure prints the usage text.

use clap::{ArgAction, Parser};
use std::ffi::OsString;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone, Default, PartialEq)]
#[command(name = "threadtest")]
#[command(disable_help_flag = true)]
#[command(disable_version_flag = true)]
pub struct Args {
    /// Minimum debug level (all, info, warning, major, critical, none)
    #[arg(short = 'd', value_name = "DEBUG_LEVEL")]
    pub debug_level: Option<String>,

    /// Print version information and exit
    #[arg(short = 'v', action = ArgAction::SetTrue)]
    pub version: bool,

    /// Configuration file path
    #[arg(short = 'c', long = "config-file", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Log output format
    #[arg(long = "log-format", value_name = "FORMAT", value_parser = ["text", "ext", "json"])]
    pub log_format: Option<String>,

    /// Write log records to this file instead of stderr
    #[arg(long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Force colored log output
    #[arg(long = "color", action = ArgAction::SetTrue, conflicts_with = "no_color")]
    pub color: bool,

    /// Disable colored log output
    #[arg(long = "no-color", action = ArgAction::SetTrue)]
    pub no_color: bool,

    /// Worker strategy
    #[arg(long = "strategy", value_name = "STRATEGY", value_parser = ["poll", "wait"])]
    pub strategy: Option<String>,

    /// Worker poll interval (and wait timeout) in milliseconds
    #[arg(long = "poll-interval-ms", value_name = "MILLIS")]
    pub poll_interval_ms: Option<u64>,

    /// Seconds between heartbeat messages
    #[arg(long = "producer-interval-secs", value_name = "SECONDS")]
    pub producer_interval_secs: Option<u64>,
}

/// What the command line asks the process to do
#[derive(Debug, Clone, PartialEq)]
pub enum CliOutcome {
    Run(Args),
    Version,
    Usage,
}

impl Args {
    pub fn parse_from_env() -> CliOutcome {
        Self::parse_from_args(std::env::args_os())
    }

    /// Parse an argument list whose first item is the program name
    pub fn parse_from_args<I, T>(args: I) -> CliOutcome
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        match Self::try_parse_from(args) {
            Ok(args) if args.version => CliOutcome::Version,
            Ok(args) => CliOutcome::Run(args),
            Err(e) => {
                log::debug!("Argument parsing failed: {}", e);
                CliOutcome::Usage
            }
        }
    }

    /// `--color` and `--no-color` as a tri-state; `None` means detect
    pub fn color_override(&self) -> Option<bool> {
        match (self.color, self.no_color) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

pub fn usage() -> String {
    let mut text = String::from("Usage:-\n");
    text.push_str("   threadtest [-d <debug_level>] [-v] [-c <file>] [--log-format <format>]\n");
    text.push_str("              [--log-file <file>] [--color | --no-color] [--strategy <poll|wait>]\n");
    text.push_str("              [--poll-interval-ms <millis>] [--producer-interval-secs <seconds>]\n\n");
    for (option, description) in [
        ("-d <debug_level>", "Level of debug to display (all, info, warning, major, critical, none)."),
        ("-v", "Application version info."),
        ("-c, --config-file <file>", "Configuration file (default: <config dir>/Threadtest/threadtest.toml)."),
        ("--log-format <format>", "Log format (text, ext, json)."),
        ("--log-file <file>", "Write log records to a file instead of stderr."),
        ("--color, --no-color", "Force or disable colored log output."),
        ("--strategy <poll|wait>", "Worker strategy (default: wait)."),
        ("--poll-interval-ms <millis>", "Worker poll interval (default: 1000)."),
        ("--producer-interval-secs <seconds>", "Seconds between heartbeat messages (default: 10, max: 604800)."),
    ] {
        text.push_str(&format!("     {:<36} - {}\n", option, description));
    }
    text
}
