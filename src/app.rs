//! Application orchestrator.
//! Loads/merges config, initializes logging, validates destinations, runs the
//! space check, and renders the aggregate decision for the user.

use anyhow::{bail, Context, Result};
use tracing::{debug, error, info, warn};

use crate::aggregate::{check_destinations, render_verdict_line, short_name};
use crate::cli::Args;
use crate::config::{
    default_config_path, ensure_default_config_exists, load_settings, Config, CONFIG_ENV_VAR,
};
use crate::config::validate_destinations;
use crate::format::format_bytes;
use crate::logging::init_tracing;
use crate::output as out;

/// Run the CLI application.
pub fn run(args: Args) -> Result<()> {
    // Handle --print-config before logging init
    if args.print_config {
        if let Ok(cfg_env) = std::env::var(CONFIG_ENV_VAR) {
            out::print_info(&format!("Using {CONFIG_ENV_VAR} (explicit):\n  {cfg_env}\n"));
            out::print_info(&format!(
                "To override, unset {CONFIG_ENV_VAR} or set it to another file."
            ));
            return Ok(());
        }
        match default_config_path() {
            Some(p) => {
                out::print_info(&format!(
                    "Default backup_preflight config path:\n  {}\n",
                    p.display()
                ));
                if p.exists() {
                    out::print_info("A config file already exists at that location.");
                } else {
                    out::print_info("No config file exists there yet. Run without --print-config to create a template.");
                }
            }
            None => {
                out::print_error("Could not determine a default config path.");
            }
        }
        return Ok(());
    }

    // Create template config if none exists (before logging init)
    if let Some(path) = ensure_default_config_exists() {
        out::print_success(&format!(
            "A template backup_preflight config was written to: {}",
            path.display()
        ));
        out::print_info("Edit the file to adjust `safety_buffer_bytes`, `low_free_percent`, `log_level` or `log_file`, then re-run this command.");
        out::print_info(&format!(
            "To use a different location set {CONFIG_ENV_VAR}."
        ));
        return Ok(());
    }

    // Build config (may read XML). CLI args override config values.
    let mut cfg = Config::default();
    if let Some(settings) = load_settings() {
        if let Some(buffer) = settings.safety_buffer {
            cfg.thresholds.safety_buffer = buffer;
        }
        if let Some(percent) = settings.low_free_percent {
            cfg.thresholds.low_free_percent = percent;
        }
        if let Some(level) = settings.log_level {
            cfg.log_level = level;
        }
        if let Some(log_file) = settings.log_file {
            cfg.log_file = Some(log_file);
        }
    }
    args.apply_overrides(&mut cfg);

    // Hold the guard until the end of the run so file logs are flushed.
    let _guard = init_tracing(&cfg.log_level, cfg.log_file.as_deref(), args.json)
        .map_err(|e| {
            out::print_error(&format!("Failed to initialize logging: {}", e));
            e
        })?;

    debug!("Starting backup_preflight: {:?}", args);

    let required_bytes = args
        .required_bytes
        .context("--required-bytes is required")?;
    validate_destinations(&args.destinations)?;

    let (decision, verdicts) =
        check_destinations(&args.destinations, required_bytes, &cfg.thresholds, cfg.sequential);

    for verdict in &verdicts {
        out::print_user(&render_verdict_line(verdict));
        let name = short_name(&verdict.destination);
        if let Some(message) = &verdict.error {
            let code = if verdict.capacity.total_bytes == 0 {
                "probe_failed"
            } else {
                "insufficient_space"
            };
            error!(
                code,
                destination = %verdict.destination.display(),
                required = verdict.required_bytes,
                available = verdict.capacity.available_bytes,
                "{name}: {message}"
            );
        } else if let Some(message) = &verdict.warning {
            warn!(
                code = "low_free_space",
                destination = %verdict.destination.display(),
                percent_free_after_copy = verdict.percent_free_after_copy,
                "{name}: {message}"
            );
        } else {
            info!(
                destination = %verdict.destination.display(),
                available = verdict.capacity.available_bytes,
                "{name}: {} available",
                format_bytes(verdict.capacity.available_bytes)
            );
        }
    }

    if decision.can_proceed {
        if decision.warnings.is_empty() {
            out::print_success(&format!(
                "All {} destination(s) have enough space for {}.",
                verdicts.len(),
                format_bytes(required_bytes)
            ));
        } else {
            out::print_success(&format!(
                "All {} destination(s) have enough space for {} ({} warning(s)).",
                verdicts.len(),
                format_bytes(required_bytes),
                decision.warnings.len()
            ));
        }
        info!(
            destinations = verdicts.len(),
            warnings = decision.warnings.len(),
            "backup can proceed"
        );
        Ok(())
    } else {
        error!(
            destinations = verdicts.len(),
            errors = decision.errors.len(),
            "backup blocked"
        );
        bail!(
            "{} of {} destination(s) block the backup",
            decision.errors.len(),
            verdicts.len()
        )
    }
}
