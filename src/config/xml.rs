//! XML configuration support.
//! - Loads settings from config.xml (quick_xml).
//! - Creates a secure template if missing (unless BACKUP_PREFLIGHT_CONFIG is set).
//!
//! Notes:
//! - This module only reads/writes the config file; destination validation happens elsewhere.
//! - Unknown XML fields cause a hard failure (panic) to surface misconfigurations early.

use anyhow::{Context, Result};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::evaluate::{DEFAULT_LOW_FREE_PERCENT, DEFAULT_SAFETY_BUFFER};
use crate::platform::{set_dir_mode_0700, set_file_mode_0600, write_config_secure_new_0600};

use super::paths::{config_file_path, default_log_path, path_has_symlink_ancestor};
use super::types::LogLevel;
use super::CONFIG_ENV_VAR;

/// Struct mirroring the XML config for deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    #[serde(rename = "safety_buffer_bytes", default, deserialize_with = "de_u64_trimmed_opt")]
    safety_buffer_bytes: Option<u64>,
    #[serde(rename = "low_free_percent", default, deserialize_with = "de_f64_trimmed_opt")]
    low_free_percent: Option<f64>,
    #[serde(rename = "log_level")]
    log_level: Option<String>,
    #[serde(rename = "log_file")]
    log_file: Option<String>,
}

/// Settings read from the config file; each field is an optional override.
#[derive(Debug, Default)]
pub struct XmlSettings {
    pub safety_buffer: Option<u64>,
    pub low_free_percent: Option<f64>,
    pub log_level: Option<LogLevel>,
    pub log_file: Option<PathBuf>,
}

// Custom deserializers that trim surrounding whitespace for optional numbers
fn de_u64_trimmed_opt<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.and_then(|s| s.trim().parse::<u64>().ok()))
}

fn de_f64_trimmed_opt<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.and_then(|s| s.trim().parse::<f64>().ok()))
}

/// Read settings from XML. OS-aware default path used if BACKUP_PREFLIGHT_CONFIG not set.
/// Returns None if no meaningful settings are present or the file doesn't exist.
pub fn load_settings() -> Option<XmlSettings> {
    let env_set = env::var_os(CONFIG_ENV_VAR).is_some();
    let cfg_path = config_file_path()?;

    // If missing: create a template (only when using default path), then return None.
    if !cfg_path.exists() {
        if !env_set {
            let _ = create_template_config(&cfg_path);
        }
        return None;
    }

    load_settings_from_path(&cfg_path)
}

/// Parse settings from a specific XML file.
pub fn load_settings_from_path(path: &Path) -> Option<XmlSettings> {
    let content = fs::read_to_string(path).ok()?;
    let parsed: XmlConfig = match from_xml_str(&content) {
        Ok(x) => x,
        Err(e) => {
            // Fail hard on unknown field (serde deny_unknown_fields); else, log and return None.
            let msg = e.to_string();
            if msg.contains("unknown field") {
                panic!(
                    "Unknown field in backup_preflight config {}: {}. Refusing to start.",
                    path.display(),
                    msg
                );
            }
            debug!("Failed to parse config.xml at {}: {}", path.display(), msg);
            return None;
        }
    };

    let settings = XmlSettings {
        safety_buffer: parsed.safety_buffer_bytes,
        low_free_percent: parsed.low_free_percent,
        log_level: parsed
            .log_level
            .as_deref()
            .and_then(|s| s.trim().parse::<LogLevel>().ok()),
        log_file: parsed.log_file.as_deref().and_then(|s| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(PathBuf::from(trimmed))
            }
        }),
    };

    // If nothing meaningful was provided, treat as "no config" so callers use defaults.
    if settings.safety_buffer.is_none()
        && settings.low_free_percent.is_none()
        && settings.log_level.is_none()
        && settings.log_file.is_none()
    {
        return None;
    }
    Some(settings)
}

/// Create default template config file and parent directory (best-effort permissions).
/// Uses secure creation to avoid following attacker-controlled symlinks on Unix.
pub fn create_template_config(path: &Path) -> Result<()> {
    if path_has_symlink_ancestor(path)? {
        return Err(anyhow::anyhow!(
            "Refusing to create config: ancestor of {} is a symlink",
            path.display()
        ));
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
        let _ = set_dir_mode_0700(parent);
    }

    let suggested_log = default_log_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "/path/to/backup_preflight.log".into());

    let content = format!(
        "<!--\n  backup_preflight configuration (XML)\n\n  Fields:\n    safety_buffer_bytes -> extra margin added to the required byte count ({DEFAULT_SAFETY_BUFFER} by default)\n    low_free_percent    -> warn when the projected post-copy free percentage drops below this ({DEFAULT_LOW_FREE_PERCENT} by default)\n    log_level           -> quiet | normal | info | debug\n    log_file            -> path to log file (optional; stdout/stderr still used)\n\n  Notes:\n    - CLI flags override XML values.\n-->\n<config>\n  <safety_buffer_bytes>{DEFAULT_SAFETY_BUFFER}</safety_buffer_bytes>\n  <low_free_percent>{DEFAULT_LOW_FREE_PERCENT}</low_free_percent>\n  <log_level>normal</log_level>\n  <log_file>{suggested_log}</log_file>\n</config>\n"
    );

    // Atomic, secure write (O_EXCL temp on Unix), then tighten perms.
    write_config_secure_new_0600(path, content.as_bytes())?;
    let _ = set_file_mode_0600(path);

    info!("Created template config at {}", path.display());
    Ok(())
}

/// Create default config if BACKUP_PREFLIGHT_CONFIG not set; return created path so the CLI can inform the user.
pub fn ensure_default_config_exists() -> Option<PathBuf> {
    if env::var_os(CONFIG_ENV_VAR).is_some() {
        return None;
    }

    let cfg_path = config_file_path()?;
    if cfg_path.exists() {
        return None;
    }

    if let Ok(true) = path_has_symlink_ancestor(&cfg_path) {
        eprintln!(
            "Refusing to create template config because an existing ancestor is a symlink: {}",
            cfg_path.display()
        );
        return None;
    }

    match create_template_config(&cfg_path) {
        Ok(()) => Some(cfg_path),
        Err(e) => {
            eprintln!(
                "Failed to create template config at {}: {}",
                cfg_path.display(),
                e
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn parses_every_field_with_whitespace() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.xml");
        fs::write(
            &path,
            "<config>\n  <safety_buffer_bytes> 50000000 </safety_buffer_bytes>\n  <low_free_percent> 5.5 </low_free_percent>\n  <log_level>debug</log_level>\n  <log_file>/tmp/pf.log</log_file>\n</config>\n",
        )
        .unwrap();
        let s = load_settings_from_path(&path).expect("settings");
        assert_eq!(s.safety_buffer, Some(50_000_000));
        assert_eq!(s.low_free_percent, Some(5.5));
        assert_eq!(s.log_level, Some(LogLevel::Debug));
        assert_eq!(s.log_file.as_deref(), Some(Path::new("/tmp/pf.log")));
    }

    #[test]
    fn empty_config_is_treated_as_absent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.xml");
        fs::write(&path, "<config>\n  <log_file></log_file>\n</config>\n").unwrap();
        assert!(load_settings_from_path(&path).is_none());
    }

    #[test]
    fn malformed_numbers_fall_back_to_none() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.xml");
        fs::write(
            &path,
            "<config>\n  <safety_buffer_bytes>lots</safety_buffer_bytes>\n  <log_level>info</log_level>\n</config>\n",
        )
        .unwrap();
        let s = load_settings_from_path(&path).expect("log_level still counts");
        assert_eq!(s.safety_buffer, None);
        assert_eq!(s.log_level, Some(LogLevel::Info));
    }

    #[test]
    fn template_round_trips_through_the_parser() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.xml");
        create_template_config(&path).unwrap();
        let s = load_settings_from_path(&path).expect("template should parse");
        assert_eq!(s.safety_buffer, Some(crate::evaluate::DEFAULT_SAFETY_BUFFER));
        assert_eq!(s.log_level, Some(LogLevel::Normal));
    }
}
