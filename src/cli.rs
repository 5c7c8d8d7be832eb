//! CLI definition and parsing.
//! Defines Args and provides parse() for command-line handling.
//!
//! Notes:
//! - --debug is a shorthand for --log-level debug.
//! - CLI flags override config values (which are loaded from XML if present).

use clap::{Parser, ValueHint};
use std::path::PathBuf;

use crate::config::types::{Config, LogLevel};

/// Check backup destinations for sufficient disk space before a copy starts.
#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Pre-flight disk-space check for backup destinations"
)]
pub struct Args {
    /// Destination directories to check.
    #[arg(
        value_name = "DESTINATION",
        value_hint = ValueHint::DirPath,
        required_unless_present = "print_config",
        num_args = 1..
    )]
    pub destinations: Vec<PathBuf>,

    /// Estimated backup payload size in bytes.
    #[arg(
        short = 'r',
        long,
        value_name = "BYTES",
        required_unless_present = "print_config"
    )]
    pub required_bytes: Option<u64>,

    /// Override the safety buffer added on top of the required bytes.
    #[arg(long, value_name = "BYTES", help = "Safety buffer in bytes (default 100000000)")]
    pub buffer: Option<u64>,

    /// Enable debug logging (equivalent to `--log-level debug`).
    #[arg(
        short = 'd',
        long,
        help = "Enable debug logging (shorthand for --log-level debug)"
    )]
    pub debug: bool,

    /// Set log level. One of: quiet, normal, info, debug.
    #[arg(long, help = "Set log level: quiet, normal, info, debug")]
    pub log_level: Option<String>,

    /// Write logs to this file in addition to stdout.
    #[arg(long, value_hint = ValueHint::FilePath, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    /// Probe destinations one at a time instead of in parallel.
    #[arg(long, help = "Probe destinations sequentially instead of in parallel")]
    pub sequential: bool,

    /// Emit logs in structured JSON (includes timestamp, level, and structured fields).
    #[arg(long, help = "Emit logs in structured JSON")]
    pub json: bool,

    /// Print where backup_preflight will look for the config file (or BACKUP_PREFLIGHT_CONFIG if set), then exit.
    #[arg(
        long,
        help = "Print the config file location used by backup_preflight and exit"
    )]
    pub print_config: bool,
}

impl Args {
    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level value > None (use config default).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level.as_deref().and_then(LogLevel::parse)
    }

    /// Apply CLI overrides to a loaded Config (in-place). No-ops for unset flags.
    pub fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(buffer) = self.buffer {
            cfg.thresholds.safety_buffer = buffer;
        }
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
        if let Some(lf) = &self.log_file {
            cfg.log_file = Some(lf.clone());
        }
        if self.sequential {
            cfg.sequential = true;
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_flag_beats_log_level() {
        let args = Args::parse_from([
            "backup_preflight",
            "/tmp",
            "--required-bytes",
            "1",
            "--debug",
            "--log-level",
            "quiet",
        ]);
        assert_eq!(args.effective_log_level(), Some(LogLevel::Debug));
    }

    #[test]
    fn overrides_apply_only_when_set() {
        let args = Args::parse_from([
            "backup_preflight",
            "/tmp",
            "--required-bytes",
            "1",
            "--buffer",
            "5",
            "--sequential",
        ]);
        let mut cfg = Config::default();
        let default_level = cfg.log_level.clone();
        args.apply_overrides(&mut cfg);
        assert_eq!(cfg.thresholds.safety_buffer, 5);
        assert!(cfg.sequential);
        assert_eq!(cfg.log_level, default_level, "log level untouched when not given");
    }

    #[test]
    fn destinations_required_unless_print_config() {
        assert!(Args::try_parse_from(["backup_preflight"]).is_err());
        assert!(Args::try_parse_from(["backup_preflight", "--print-config"]).is_ok());
    }
}
