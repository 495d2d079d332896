//! Time formatting helpers.

/// Format a duration in seconds to a human-readable string.
pub fn format_duration(secs: u64) -> String {
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs < 86400 {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    } else {
        format!("{}d {}h", secs / 86400, (secs % 86400) / 3600)
    }
}

/// Describe how long until `expires_at`, or `"expired"` once it has passed.
pub fn format_time_to_expiry(expires_at_secs: u64, now_secs: u64) -> String {
    match expires_at_secs.checked_sub(now_secs) {
        Some(left) if left > 0 => format!("in {}", format_duration(left)),
        _ => "expired".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_unit_by_magnitude() {
        assert_eq!(format_duration(0), "0s");
        assert_eq!(format_duration(59), "59s");
        assert_eq!(format_duration(61), "1m 1s");
        assert_eq!(format_duration(3600 + 120), "1h 2m");
        assert_eq!(format_duration(86400 * 2 + 3600 * 5), "2d 5h");
    }

    #[test]
    fn expiry_is_reported_relative_to_now() {
        assert_eq!(format_time_to_expiry(1000, 940), "in 1m 0s");
        assert_eq!(format_time_to_expiry(1000, 1000), "expired");
        assert_eq!(format_time_to_expiry(1000, 2000), "expired");
    }
}
