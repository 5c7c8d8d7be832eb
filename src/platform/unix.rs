//! Unix (non-macOS) implementations of platform helpers.

use super::common_unix::atomic_write_0600;
use super::FsStats;
use anyhow::Result;
use std::ffi::CString;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::mem::MaybeUninit;
use std::os::unix::ffi::OsStrExt;
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
use std::path::Path;

/// Open log file for appending; set 0600 only when creating a new file.
/// If the file already exists, we preserve its existing permissions to avoid
/// clobbering administrator adjustments (e.g. group-readable for log shipping).
pub fn open_log_file_secure_append(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let existed = path.exists();
    let f = OpenOptions::new()
        .create(true)
        .append(true)
        .mode(0o600) // applies on create
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

fn c_path(path: &Path) -> io::Result<CString> {
    CString::new(path.as_os_str().as_bytes())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "path contains null byte"))
}

/// One low-level statistics query for the path's mount.
///
/// statvfs supplies the block counts; a companion statfs supplies the
/// filesystem type magic so network mounts can be recognized. Both hit the
/// same mount entry, so the pair still counts as a single probe of the mount.
pub fn fs_stats(path: &Path) -> io::Result<FsStats> {
    let cpath = c_path(path)?;

    let (total_bytes, free_bytes, available_bytes) = unsafe {
        let mut stat: MaybeUninit<libc::statvfs> = MaybeUninit::uninit();
        if libc::statvfs(cpath.as_ptr(), stat.as_mut_ptr()) != 0 {
            return Err(io::Error::last_os_error());
        }
        let stat = stat.assume_init();
        let block = if stat.f_frsize > 0 {
            stat.f_frsize
        } else {
            stat.f_bsize
        } as u64;
        (
            (stat.f_blocks as u64).saturating_mul(block),
            (stat.f_bfree as u64).saturating_mul(block),
            (stat.f_bavail as u64).saturating_mul(block),
        )
    };

    let fstype = unsafe {
        let mut stat: MaybeUninit<libc::statfs> = MaybeUninit::uninit();
        if libc::statfs(cpath.as_ptr(), stat.as_mut_ptr()) == 0 {
            filesystem_type_name(stat.assume_init().f_type as u32)
        } else {
            None
        }
    };

    Ok(FsStats {
        fstype,
        total_bytes,
        free_bytes,
        available_bytes,
    })
}

// statfs(2) magic numbers for the remote filesystems we care about.
const NFS_SUPER_MAGIC: u32 = 0x6969;
const SMB_SUPER_MAGIC: u32 = 0x517B;
const SMB2_SUPER_MAGIC: u32 = 0xFE53_4D42;
const CIFS_SUPER_MAGIC: u32 = 0xFF53_4D42;
const AFS_SUPER_MAGIC: u32 = 0x5346_414F;

fn filesystem_type_name(magic: u32) -> Option<String> {
    let name = match magic {
        NFS_SUPER_MAGIC => "nfs",
        SMB_SUPER_MAGIC => "smb",
        SMB2_SUPER_MAGIC => "smb2",
        CIFS_SUPER_MAGIC => "cifs",
        AFS_SUPER_MAGIC => "afs",
        _ => return None,
    };
    Some(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::tempdir;

    #[test]
    fn preserve_existing_log_file_mode() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("log.txt");
        fs::write(&path, b"hello").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).unwrap();
        let _f = open_log_file_secure_append(&path).unwrap();
        // Mode should remain 0640 (not forced to 0600) because file pre-existed.
        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640, "existing permissions should be preserved");
    }

    #[test]
    fn new_log_file_gets_0600() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("new_log.txt");
        assert!(!path.exists());
        let _f = open_log_file_secure_append(&path).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600, "newly created log file should be 0600");
    }

    #[test]
    fn fs_stats_smoke() {
        let dir = tempdir().unwrap();
        let stats = fs_stats(dir.path()).unwrap();
        assert!(stats.total_bytes > 0);
        assert!(stats.available_bytes <= stats.free_bytes);
        assert!(stats.free_bytes <= stats.total_bytes);
    }

    #[test]
    fn fs_stats_nonexistent_path_errors() {
        let p = Path::new("/this/definitely/does/not/exist/backup_preflight_test");
        assert!(fs_stats(p).is_err());
    }

    #[test]
    fn only_remote_magics_are_named() {
        assert_eq!(filesystem_type_name(NFS_SUPER_MAGIC).as_deref(), Some("nfs"));
        assert_eq!(filesystem_type_name(CIFS_SUPER_MAGIC).as_deref(), Some("cifs"));
        // ext4 magic stays anonymous; local mounts take the high-level path.
        assert_eq!(filesystem_type_name(0xEF53), None);
    }
}
