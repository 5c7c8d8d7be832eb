//! Default path helpers and symlink checks.
//! Determines OS-appropriate config/log paths and detects symlinked ancestors for safety.

use dirs::{config_dir, data_dir};
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::CONFIG_ENV_VAR;

/// OS-appropriate default config path.
pub fn default_config_path() -> Option<PathBuf> {
    if let Some(mut base) = config_dir() {
        base.push("backup_preflight");
        base.push("config.xml");
        Some(base)
    } else {
        env::var("HOME").ok().map(|h| {
            PathBuf::from(h)
                .join(".config")
                .join("backup_preflight")
                .join("config.xml")
        })
    }
}

/// Config path in effect: BACKUP_PREFLIGHT_CONFIG wins over the default.
pub fn config_file_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os(CONFIG_ENV_VAR) {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// OS-appropriate default log file path (data dir).
pub fn default_log_path() -> Option<PathBuf> {
    if let Some(mut base) = data_dir() {
        base.push("backup_preflight");
        base.push("backup_preflight.log");
        Some(base)
    } else {
        env::var("HOME").ok().map(|h| {
            PathBuf::from(h)
                .join(".local")
                .join("share")
                .join("backup_preflight")
                .join("backup_preflight.log")
        })
    }
}

/// Return true if any existing ancestor of `path` is a symlink.
pub fn path_has_symlink_ancestor(path: &Path) -> io::Result<bool> {
    let mut p = path.parent();
    while let Some(anc) = p {
        if anc.exists() {
            let meta = fs::symlink_metadata(anc)?;
            if meta.file_type().is_symlink() {
                return Ok(true);
            }
        }
        p = anc.parent();
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn default_paths_end_with_expected_names() {
        let cfg = default_config_path().expect("config path");
        assert_eq!(cfg.file_name().unwrap().to_string_lossy(), "config.xml");
        let log = default_log_path().expect("log path");
        assert_eq!(
            log.file_name().unwrap().to_string_lossy(),
            "backup_preflight.log"
        );
    }

    #[cfg(unix)]
    #[test]
    fn detects_symlinked_ancestor() {
        let dir = tempdir().unwrap();
        let real = dir.path().join("real");
        fs::create_dir(&real).unwrap();
        let link = dir.path().join("link");
        std::os::unix::fs::symlink(&real, &link).unwrap();
        assert!(path_has_symlink_ancestor(&link.join("config.xml")).unwrap());
        assert!(!path_has_symlink_ancestor(&real.join("config.xml")).unwrap());
    }
}
