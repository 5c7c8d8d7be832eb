//! Byte-count formatting for user-facing messages.
//! Decimal units (kB/MB/GB/TB) so every emitted message uses the same convention.

/// Render a byte count as a short human-readable figure, e.g. "1.2 GB".
pub fn format_bytes(n: u64) -> String {
    const KB: f64 = 1000.0;
    const MB: f64 = KB * 1000.0;
    const GB: f64 = MB * 1000.0;
    const TB: f64 = GB * 1000.0;
    let f = n as f64;
    if f >= TB {
        format!("{:.1} TB", f / TB)
    } else if f >= GB {
        format!("{:.1} GB", f / GB)
    } else if f >= MB {
        format!("{:.1} MB", f / MB)
    } else if f >= KB {
        format!("{:.1} kB", f / KB)
    } else {
        format!("{} B", n)
    }
}
