//! Destination validation.
//! Verifies each destination exists, is a directory, and is writable before any
//! capacity probing happens, so probe failures always mean "capacity unknown"
//! rather than "bad path".

use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

use crate::errors::PreflightError;

/// Validate all destinations up front; the first bad one aborts the run.
pub fn validate_destinations(destinations: &[PathBuf]) -> Result<()> {
    for dest in destinations {
        ensure_dir_exists_and_is_dir(dest)?;
        ensure_writable(dest)?;
    }
    Ok(())
}

fn ensure_dir_exists_and_is_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        error!("destination does not exist: {}", path.display());
        return Err(PreflightError::DestinationInvalid(path.to_path_buf()))
            .with_context(|| format!("destination does not exist: {}", path.display()));
    }
    if !path.is_dir() {
        error!("destination is not a directory: {}", path.display());
        return Err(PreflightError::DestinationInvalid(path.to_path_buf()))
            .with_context(|| format!("destination is not a directory: {}", path.display()));
    }
    Ok(())
}

/// Ensure directory is writable using a non-destructive probe file.
fn ensure_writable(path: &Path) -> Result<()> {
    is_writable_probe(path).with_context(|| {
        format!(
            "Cannot write to destination '{}'; check permissions",
            path.display()
        )
    })?;
    debug!("destination writable: {}", path.display());
    Ok(())
}

/// Writability probe: create & remove a small unique temp file.
fn is_writable_probe(dir: &Path) -> io::Result<()> {
    let probe = dir.join(format!(".backup_preflight_probe_{}.tmp", std::process::id()));
    match fs::OpenOptions::new()
        .create_new(true)
        .write(true)
        .open(&probe)
    {
        Ok(_) => {
            let _ = fs::remove_file(&probe);
            Ok(())
        }
        Err(e) => Err(e),
    }
}
