//! Capacity figures for a single destination path.

/// Total/free/available capacity of a destination's volume, in bytes.
///
/// Produced fresh on every probe, never cached. `free_bytes` counts space
/// reclaimable by any process (including reserved blocks); `available_bytes`
/// is what this unprivileged process can actually use.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CapacityInfo {
    pub total_bytes: u64,
    pub free_bytes: u64,
    pub available_bytes: u64,
}

impl CapacityInfo {
    pub fn new(total_bytes: u64, free_bytes: u64, available_bytes: u64) -> Self {
        Self {
            total_bytes,
            free_bytes,
            available_bytes,
        }
    }

    /// Percentage of the volume that is free, 0 when the total is unknown.
    pub fn percent_free(&self) -> f64 {
        percent_of(self.free_bytes, self.total_bytes)
    }

    /// Percentage of the volume usable by this process, 0 when the total is unknown.
    pub fn percent_available(&self) -> f64 {
        percent_of(self.available_bytes, self.total_bytes)
    }
}

fn percent_of(part: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    part as f64 / total as f64 * 100.0
}
