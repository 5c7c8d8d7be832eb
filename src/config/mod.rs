//! Config module (modularized).
//! Provides configuration types, default paths, XML loading, and destination validation.

pub mod paths;
pub mod types;
pub mod validate;
pub mod xml;

pub use paths::{config_file_path, default_config_path, default_log_path, path_has_symlink_ancestor};
pub use types::{Config, LogLevel};
pub use validate::validate_destinations;
pub use xml::{create_template_config, ensure_default_config_exists, load_settings};

/// Environment variable naming an explicit config file location.
pub const CONFIG_ENV_VAR: &str = "BACKUP_PREFLIGHT_CONFIG";
