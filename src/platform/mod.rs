//! Platform-specific helpers.
//! This module hides OS differences (Unix/Windows) behind a uniform API so
//! the rest of the codebase can remain platform-agnostic.

#[cfg(unix)]
mod common_unix;
mod temp;

#[cfg(target_os = "macos")]
mod macos;
#[cfg(all(unix, not(target_os = "macos")))]
mod unix;
#[cfg(windows)]
mod windows;

#[cfg(target_os = "macos")]
pub use macos::{
    fs_stats, open_log_file_secure_append, set_dir_mode_0700, set_file_mode_0600,
    write_config_secure_new_0600,
};
#[cfg(all(unix, not(target_os = "macos")))]
pub use unix::{
    fs_stats, open_log_file_secure_append, set_dir_mode_0700, set_file_mode_0600,
    write_config_secure_new_0600,
};
#[cfg(windows)]
pub use windows::{
    fs_stats, open_log_file_secure_append, set_dir_mode_0700, set_file_mode_0600,
    write_config_secure_new_0600,
};

/// Raw figures from one low-level filesystem-statistics query.
///
/// `fstype` is the mount's filesystem type name when the OS reports one
/// (e.g. "nfs", "smbfs", "ext4"); `None` where the tier cannot name it.
#[derive(Debug, Clone)]
pub struct FsStats {
    pub fstype: Option<String>,
    pub total_bytes: u64,
    pub free_bytes: u64,
    pub available_bytes: u64,
}
