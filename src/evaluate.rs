//! Per-destination space evaluation.
//!
//! Pure and deterministic: given the probed capacity, the required byte count
//! and the thresholds, the same verdict always comes out. No I/O happens here;
//! a failed probe arrives as `None` and is treated as dangerous (fail-safe).

use std::path::{Path, PathBuf};

use crate::format::format_bytes;
use crate::probe::CapacityInfo;

/// Extra margin added to the required byte count to avoid exact-fit failures.
pub const DEFAULT_SAFETY_BUFFER: u64 = 100_000_000;

/// Post-copy free percentage below which a warning fires.
pub const DEFAULT_LOW_FREE_PERCENT: f64 = 10.0;

/// Tunable policy knobs for the evaluator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub safety_buffer: u64,
    pub low_free_percent: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            safety_buffer: DEFAULT_SAFETY_BUFFER,
            low_free_percent: DEFAULT_LOW_FREE_PERCENT,
        }
    }
}

/// Outcome of probing and evaluating one destination.
#[derive(Debug, Clone, PartialEq)]
pub struct SpaceVerdict {
    pub destination: PathBuf,
    /// Zero-valued if the probe failed entirely.
    pub capacity: CapacityInfo,
    pub required_bytes: u64,
    pub sufficient: bool,
    pub low_free_after_copy: bool,
    pub percent_free_after_copy: f64,
    /// Set only when the destination is sufficient but would be left low on space.
    pub warning: Option<String>,
    /// Set only when probing failed or space is insufficient.
    pub error: Option<String>,
}

impl SpaceVerdict {
    /// A destination blocks the copy when it is insufficient or errored.
    pub fn blocks_copy(&self) -> bool {
        !self.sufficient || self.error.is_some()
    }
}

/// Classify one destination. `probed` is `None` when every capacity strategy
/// failed; that is treated as unsafe, never as zero bytes needed.
pub fn evaluate(
    destination: &Path,
    probed: Option<CapacityInfo>,
    required_bytes: u64,
    thresholds: &Thresholds,
) -> SpaceVerdict {
    let Some(capacity) = probed else {
        return SpaceVerdict {
            destination: destination.to_path_buf(),
            capacity: CapacityInfo::default(),
            required_bytes,
            sufficient: false,
            low_free_after_copy: true,
            percent_free_after_copy: 0.0,
            warning: None,
            error: Some("unable to determine available disk space".to_string()),
        };
    };

    let total_required = required_bytes.saturating_add(thresholds.safety_buffer);
    let sufficient = capacity.available_bytes >= total_required;

    // May be negative; deliberately not clamped.
    let space_after_copy = capacity.free_bytes as i128 - required_bytes as i128;
    let percent_free_after_copy = if capacity.total_bytes == 0 {
        0.0
    } else {
        space_after_copy as f64 / capacity.total_bytes as f64 * 100.0
    };
    let low_free_after_copy = percent_free_after_copy < thresholds.low_free_percent;

    let error = (!sufficient).then(|| {
        format!(
            "insufficient space: {} required (including {} safety buffer), only {} available",
            format_bytes(total_required),
            format_bytes(thresholds.safety_buffer),
            format_bytes(capacity.available_bytes),
        )
    });
    let warning = (sufficient && low_free_after_copy).then(|| {
        format!(
            "only {percent_free_after_copy:.1}% of the volume would remain free after the copy"
        )
    });

    SpaceVerdict {
        destination: destination.to_path_buf(),
        capacity,
        required_bytes,
        sufficient,
        low_free_after_copy,
        percent_free_after_copy,
        warning,
        error,
    }
}
