//! Multi-destination aggregation.
//!
//! Probes and evaluates every destination independently, then reduces the
//! verdicts into one go/no-go decision. A single blocking destination blocks
//! the whole backup; warnings are informational only. Destinations may be
//! probed in parallel, but output always follows caller-supplied order.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::evaluate::{evaluate, SpaceVerdict, Thresholds};
use crate::format::format_bytes;
use crate::probe::probe;

/// Reduced go/no-go decision across all destinations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateDecision {
    /// True iff no destination produced an error.
    pub can_proceed: bool,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

/// Probe and evaluate each destination, preserving input order in the output.
///
/// Each probe touches only its own path, so parallel probing needs no
/// coordination; rayon's indexed collect restores the input order.
/// `sequential` forces one-at-a-time probing.
pub fn check_destinations(
    destinations: &[PathBuf],
    required_bytes: u64,
    thresholds: &Thresholds,
    sequential: bool,
) -> (AggregateDecision, Vec<SpaceVerdict>) {
    let verdicts: Vec<SpaceVerdict> = if sequential || destinations.len() < 2 {
        destinations
            .iter()
            .map(|dest| probe_and_evaluate(dest, required_bytes, thresholds))
            .collect()
    } else {
        destinations
            .par_iter()
            .map(|dest| probe_and_evaluate(dest, required_bytes, thresholds))
            .collect()
    };

    let decision = decide(&verdicts);
    debug!(
        destinations = destinations.len(),
        errors = decision.errors.len(),
        warnings = decision.warnings.len(),
        can_proceed = decision.can_proceed,
        "space check complete"
    );
    (decision, verdicts)
}

fn probe_and_evaluate(
    destination: &Path,
    required_bytes: u64,
    thresholds: &Thresholds,
) -> SpaceVerdict {
    let probed = match probe(destination) {
        Ok(capacity) => Some(capacity),
        Err(e) => {
            warn!(code = e.code(), destination = %destination.display(), "capacity probe failed");
            None
        }
    };
    evaluate(destination, probed, required_bytes, thresholds)
}

/// Reduce per-destination verdicts into one decision. Never fails: even when
/// every destination errors, a decision comes out.
pub fn decide(verdicts: &[SpaceVerdict]) -> AggregateDecision {
    let mut warnings = Vec::new();
    let mut errors = Vec::new();
    for verdict in verdicts {
        let name = short_name(&verdict.destination);
        if let Some(error) = &verdict.error {
            errors.push(format!("{name}: {error}"));
        } else if let Some(warning) = &verdict.warning {
            warnings.push(format!("{name}: {warning}"));
        }
    }
    AggregateDecision {
        can_proceed: errors.is_empty(),
        warnings,
        errors,
    }
}

/// Short display name for a destination (final path component).
pub fn short_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Render one verdict as a glyph-prefixed report line. Presentation only.
pub fn render_verdict_line(verdict: &SpaceVerdict) -> String {
    let name = short_name(&verdict.destination);
    if let Some(error) = &verdict.error {
        format!("✖ {name}: {error}")
    } else if let Some(warning) = &verdict.warning {
        format!("⚠ {name}: {warning}")
    } else {
        format!(
            "✔ {name}: {} available",
            format_bytes(verdict.capacity.available_bytes)
        )
    }
}
