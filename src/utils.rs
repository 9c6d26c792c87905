use chrono::{Local, TimeZone};

/// Format a millisecond unix timestamp as local HH:MM:SS.mmm.
pub fn format_timestamp(timestamp_ms: i64) -> String {
    match Local.timestamp_millis_opt(timestamp_ms).single() {
        Some(time) => time.format("%H:%M:%S%.3f").to_string(),
        None => format!("Invalid timestamp: {}", timestamp_ms),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_milliseconds() {
        let formatted = format_timestamp(1_700_000_000_123);
        assert!(formatted.ends_with(".123"), "got {}", formatted);
        assert_eq!(formatted.len(), "00:00:00.123".len());
    }

    #[test]
    fn rejects_out_of_range_timestamp() {
        assert!(format_timestamp(i64::MAX).starts_with("Invalid timestamp"));
    }
}
