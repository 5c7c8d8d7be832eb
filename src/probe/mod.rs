//! Capacity probing for one destination path.
//!
//! A probe runs an ordered chain of query strategies and returns the first
//! result whose figures are trustworthy (non-zero volume total). Network
//! mounts (NFS/SMB/AFP/WebDAV/CIFS) are known to misreport through high-level
//! capacity APIs, so for those the low-level statistics call is consulted
//! first; local mounts prefer the volume-metadata tier. A probe either yields
//! a `CapacityInfo` or an explicit failure, never "zero space available".

mod capacity;

pub use capacity::CapacityInfo;

use std::fs;
use std::path::Path;

use sysinfo::Disks;
use tracing::{debug, warn};

use crate::errors::PreflightError;
use crate::platform::{self, FsStats};

/// Filesystem type names treated as network mounts (compared case-insensitively).
const NETWORK_FILESYSTEMS: &[&str] = &[
    "nfs", "nfs4", "smb", "smb2", "smbfs", "afp", "afpfs", "webdav", "cifs",
];

/// True when `name` identifies a remote-access filesystem.
pub fn is_network_filesystem(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    NETWORK_FILESYSTEMS.iter().any(|fs| lower == *fs)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strategy {
    /// Block counts from statvfs/statfs (GetDiskFreeSpaceExW on Windows).
    LowLevelStats,
    /// Whole-volume totals from the OS volume enumeration; free == available here.
    VolumeMetadata,
    /// Filesystem attribute totals (total + free size); available == free here.
    LegacyAttributes,
}

/// Strategy order for one probe. Network mounts get the low-level figures
/// first; local mounts try the higher tiers and keep the low-level call as a
/// last resort.
fn strategy_order(network_mount: bool) -> [Strategy; 3] {
    if network_mount {
        [
            Strategy::LowLevelStats,
            Strategy::VolumeMetadata,
            Strategy::LegacyAttributes,
        ]
    } else {
        [
            Strategy::VolumeMetadata,
            Strategy::LegacyAttributes,
            Strategy::LowLevelStats,
        ]
    }
}

/// Acceptance predicate shared by all strategies: a zero volume total means
/// the source answered but cannot be trusted, so the chain must fall through.
fn accept(cap: CapacityInfo) -> Option<CapacityInfo> {
    (cap.total_bytes > 0).then_some(cap)
}

/// First accepted result wins; later attempts are never evaluated.
fn first_accepted<I>(attempts: I) -> Option<CapacityInfo>
where
    I: IntoIterator<Item = Option<CapacityInfo>>,
{
    attempts.into_iter().find_map(|cap| cap.and_then(accept))
}

/// Determine total/free/available capacity for `path`.
///
/// The low-level statistics call is issued once and its result reused for
/// both mount-type detection and the low-level capacity figures.
pub fn probe(path: &Path) -> Result<CapacityInfo, PreflightError> {
    let raw = match platform::fs_stats(path) {
        Ok(stats) => Some(stats),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "low-level filesystem statistics unavailable");
            None
        }
    };

    let network_mount = raw
        .as_ref()
        .and_then(|r| r.fstype.as_deref())
        .is_some_and(is_network_filesystem);
    if network_mount {
        debug!(
            path = %path.display(),
            fstype = raw.as_ref().and_then(|r| r.fstype.as_deref()).unwrap_or(""),
            "network mount detected; preferring low-level statistics"
        );
    }

    let order = strategy_order(network_mount);
    let result = first_accepted(
        order
            .iter()
            .map(|&strategy| attempt(strategy, path, raw.as_ref())),
    );

    match result {
        Some(cap) => {
            debug!(
                path = %path.display(),
                total = cap.total_bytes,
                free = cap.free_bytes,
                available = cap.available_bytes,
                "capacity probe accepted"
            );
            Ok(cap)
        }
        None => {
            warn!(path = %path.display(), "all capacity strategies failed");
            Err(PreflightError::ProbeFailed(path.to_path_buf()))
        }
    }
}

fn attempt(strategy: Strategy, path: &Path, raw: Option<&FsStats>) -> Option<CapacityInfo> {
    match strategy {
        Strategy::LowLevelStats => raw.map(|r| {
            CapacityInfo::new(r.total_bytes, r.free_bytes, r.available_bytes)
        }),
        Strategy::VolumeMetadata => volume_metadata(path),
        Strategy::LegacyAttributes => legacy_attributes(path),
    }
}

/// Volume-enumeration tier: match the path to the mount point with the
/// longest prefix and take that volume's totals. The OS reports a single
/// available figure at this tier, so free and available are equal.
fn volume_metadata(path: &Path) -> Option<CapacityInfo> {
    // Prefix matching needs an absolute, resolved path.
    let resolved = fs::canonicalize(path).ok()?;
    let disks = Disks::new_with_refreshed_list();
    disks
        .iter()
        .filter(|disk| resolved.starts_with(disk.mount_point()))
        .max_by_key(|disk| disk.mount_point().as_os_str().len())
        .map(|disk| {
            CapacityInfo::new(
                disk.total_space(),
                disk.available_space(),
                disk.available_space(),
            )
        })
}

/// Filesystem-attribute tier: total size and free size only, so available
/// is taken to equal free.
fn legacy_attributes(path: &Path) -> Option<CapacityInfo> {
    let total = fs2::total_space(path).ok()?;
    let free = fs2::free_space(path).ok()?;
    Some(CapacityInfo::new(total, free, free))
}
