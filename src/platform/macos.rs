//! macOS implementations of platform helpers.
//! Split from the generic Unix module because statfs(2) here reports the
//! filesystem type by name (f_fstypename) rather than by magic number.

use super::common_unix::atomic_write_0600;
use super::FsStats;
use anyhow::Result;
use std::ffi::{CStr, CString};
use std::fs::{self, File, OpenOptions};
use std::io;
use std::mem::MaybeUninit;
use std::os::unix::ffi::OsStrExt;
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
use std::path::Path;

/// Open log file for appending. Set 0600 only when creating a new file; preserve existing mode.
pub fn open_log_file_secure_append(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let existed = path.exists();
    let f = OpenOptions::new()
        .create(true)
        .append(true)
        .mode(0o600) // applied on create
        .open(path)?;
    if !existed {
        let _ = fs::set_permissions(path, fs::Permissions::from_mode(0o600));
    }
    Ok(f)
}

/// Write config atomically: temp file (0600) + fsync + rename + fsync dir.
pub fn write_config_secure_new_0600(path: &Path, contents: &[u8]) -> Result<()> {
    atomic_write_0600(path, contents)
}

/// POSIX chmod 0700 for directories.
pub fn set_dir_mode_0700(path: &Path) -> io::Result<()> {
    let perm = fs::Permissions::from_mode(0o700);
    fs::set_permissions(path, perm)
}

/// POSIX chmod 0600 for files.
pub fn set_file_mode_0600(path: &Path) -> io::Result<()> {
    let perm = fs::Permissions::from_mode(0o600);
    fs::set_permissions(path, perm)
}

/// One statfs(2) call yields both the filesystem type name and the block
/// counts, so mount-type detection and the low-level capacity figures come
/// from the same query.
pub fn fs_stats(path: &Path) -> io::Result<FsStats> {
    let cpath = CString::new(path.as_os_str().as_bytes())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "path contains null byte"))?;
    unsafe {
        let mut stat: MaybeUninit<libc::statfs> = MaybeUninit::uninit();
        if libc::statfs(cpath.as_ptr(), stat.as_mut_ptr()) != 0 {
            return Err(io::Error::last_os_error());
        }
        let stat = stat.assume_init();
        let name = CStr::from_ptr(stat.f_fstypename.as_ptr())
            .to_string_lossy()
            .into_owned();
        let block = stat.f_bsize as u64;
        Ok(FsStats {
            fstype: if name.is_empty() { None } else { Some(name) },
            total_bytes: stat.f_blocks.saturating_mul(block),
            free_bytes: stat.f_bfree.saturating_mul(block),
            available_bytes: stat.f_bavail.saturating_mul(block),
        })
    }
}
