//! Time formatting helpers.

use auditor_types::Timestamp;

/// Format a duration in seconds to a human-readable string.
pub fn format_duration(secs: u64) -> String {
    match secs {
        0..=59 => format!("{secs}s"),
        60..=3_599 => format!("{}m {}s", secs / 60, secs % 60),
        3_600..=86_399 => format!("{}h {}m", secs / 3_600, (secs % 3_600) / 60),
        _ => format!("{}d {}h", secs / 86_400, (secs % 86_400) / 3_600),
    }
}

/// Time left from `now` until `until`, or `"now"` once it has passed.
pub fn format_remaining(now: Timestamp, until: Timestamp) -> String {
    match until.as_secs().checked_sub(now.as_secs()) {
        Some(left) if left > 0 => format_duration(left),
        _ => "now".to_string(),
    }
}
