//! Wall-clock parsing and formatting for scheduler time strings

use chrono::{NaiveDateTime, NaiveTime};

/// Parse a strict "HH:MM" wire string (the format the backend stores)
pub fn parse_hhmm(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M").ok()
}

/// Format a time as the zero-padded "HH:MM" wire string
pub fn format_hhmm(t: NaiveTime) -> String {
    t.format("%H:%M").to_string()
}

/// Parse a user-entered clock time (e.g. "9", "9:30", "14:30", "2pm") to a NaiveTime
pub fn parse_clock_time(input: &str) -> Option<NaiveTime> {
    let input = input.trim().to_lowercase();
    if input.is_empty() {
        return None;
    }

    // Check for am/pm suffix
    let (time_part, is_pm) = if input.ends_with("pm") {
        (&input[..input.len() - 2], true)
    } else if input.ends_with("am") {
        (&input[..input.len() - 2], false)
    } else if input.ends_with("p") {
        (&input[..input.len() - 1], true)
    } else if input.ends_with("a") {
        (&input[..input.len() - 1], false)
    } else {
        (input.as_str(), false) // 24-hour format assumed
    };

    let time_part = time_part.trim();

    // Parse hour and optional minute
    let (hour, minute) = if time_part.contains(':') {
        let parts: Vec<&str> = time_part.split(':').collect();
        let h = parts[0].parse::<u32>().ok()?;
        let m = parts.get(1).and_then(|s| s.parse::<u32>().ok()).unwrap_or(0);
        (h, m)
    } else {
        let h = time_part.parse::<u32>().ok()?;
        (h, 0)
    };

    // Convert to 24-hour format if am/pm was specified
    let hour_24 = if is_pm && hour < 12 {
        hour + 12
    } else if !is_pm && hour == 12 && input.contains('a') {
        0 // 12am = midnight
    } else {
        hour
    };

    NaiveTime::from_hms_opt(hour_24, minute, 0)
}

/// Split a range input like "9:00 - 10:30" into its two halves.
/// Either half may be absent while the user is still typing.
pub fn parse_range_text(text: &str) -> (Option<NaiveTime>, Option<NaiveTime>) {
    let mut halves = text.splitn(2, ['-', '\u{2013}']);
    let start = halves.next().and_then(parse_clock_time);
    let end = halves.next().and_then(parse_clock_time);
    (start, end)
}

/// Parse a comment timestamp as sent by the backend.
/// Tries ISO with and without fractional seconds, then the RFC 2822 form
/// Flask produces when a datetime is jsonified directly.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(dt);
    }
    chrono::DateTime::parse_from_rfc2822(s)
        .ok()
        .map(|dt| dt.naive_local())
}

/// Display form for comment timestamps, e.g. "Mar 24, 2024 14:05".
/// Falls back to the raw string if the backend sent something unexpected.
pub fn format_timestamp(s: &str) -> String {
    match parse_timestamp(s) {
        Some(dt) => dt.format("%b %-d, %Y %H:%M").to_string(),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn parses_strict_wire_times() {
        assert_eq!(parse_hhmm("09:00"), Some(t(9, 0)));
        assert_eq!(parse_hhmm(" 23:59 "), Some(t(23, 59)));
        assert_eq!(parse_hhmm("9"), None);
        assert_eq!(parse_hhmm("25:00"), None);
    }

    #[test]
    fn formats_zero_padded() {
        assert_eq!(format_hhmm(t(9, 5)), "09:05");
        assert_eq!(format_hhmm(t(14, 30)), "14:30");
    }

    #[test]
    fn lenient_clock_parsing() {
        assert_eq!(parse_clock_time("9"), Some(t(9, 0)));
        assert_eq!(parse_clock_time("9:30"), Some(t(9, 30)));
        assert_eq!(parse_clock_time("14:30"), Some(t(14, 30)));
        assert_eq!(parse_clock_time("2pm"), Some(t(14, 0)));
        assert_eq!(parse_clock_time("12am"), Some(t(0, 0)));
        assert_eq!(parse_clock_time("12pm"), Some(t(12, 0)));
        assert_eq!(parse_clock_time(""), None);
        assert_eq!(parse_clock_time("24:00"), None);
        assert_eq!(parse_clock_time("nope"), None);
    }

    #[test]
    fn splits_range_input() {
        assert_eq!(parse_range_text("9:00 - 10:30"), (Some(t(9, 0)), Some(t(10, 30))));
        assert_eq!(parse_range_text("14:00 \u{2013} 15:00"), (Some(t(14, 0)), Some(t(15, 0))));
        assert_eq!(parse_range_text("9:00 -"), (Some(t(9, 0)), None));
        assert_eq!(parse_range_text("- 10:00"), (None, Some(t(10, 0))));
        assert_eq!(parse_range_text(""), (None, None));
    }

    #[test]
    fn parses_backend_timestamps() {
        assert!(parse_timestamp("2024-03-24T14:05:00").is_some());
        assert!(parse_timestamp("2024-03-24 14:05:00.123456").is_some());
        assert!(parse_timestamp("Sun, 24 Mar 2024 14:05:00 GMT").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }
}
