//! Core library for `backup_preflight`.
//!
//! Answers one question for a set of backup destinations: is there enough
//! disk space to safely run the copy? Each destination is probed through an
//! ordered chain of capacity strategies (network mounts prefer the low-level
//! statistics call), the result is evaluated against the required bytes plus
//! a safety buffer, and the per-destination verdicts reduce into a single
//! proceed / proceed-with-warnings / block decision. The copy itself,
//! notifications and sleep prevention belong to the surrounding application.

pub mod aggregate;
pub mod app;
pub mod cli;
pub mod config;
pub mod errors;
pub mod evaluate;
pub mod format;
pub mod logging;
pub mod output;
pub mod platform;
pub mod probe;

pub use aggregate::{check_destinations, decide, render_verdict_line, AggregateDecision};
pub use config::{Config, LogLevel};
pub use errors::PreflightError;
pub use evaluate::{
    evaluate, SpaceVerdict, Thresholds, DEFAULT_LOW_FREE_PERCENT, DEFAULT_SAFETY_BUFFER,
};
pub use format::format_bytes;
pub use probe::{is_network_filesystem, probe, CapacityInfo};
