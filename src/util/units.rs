//! Units formatting utilities
//!
//! Human-readable formatting of operation counts and elapsed times for the
//! driver's table output and record summaries.

use std::time::Duration;

/// Format an operation count with a K/M/G suffix
///
/// # Examples
/// ```
/// use treebench::util::units::format_count;
///
/// assert_eq!(format_count(999), "999");
/// assert_eq!(format_count(1_000), "1.0 K");
/// assert_eq!(format_count(2_500_000), "2.5 M");
/// ```
pub fn format_count(count: u64) -> String {
    const UNITS: &[&str] = &["", "K", "M", "G"];
    const THRESHOLD: f64 = 1000.0;

    if count < 1000 {
        return count.to_string();
    }

    let mut value = count as f64;
    let mut unit_index = 0;

    while value >= THRESHOLD && unit_index < UNITS.len() - 1 {
        value /= THRESHOLD;
        unit_index += 1;
    }

    format!("{:.1} {}", value, UNITS[unit_index])
}

/// Format an elapsed time as whole milliseconds
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use treebench::util::units::format_millis;
///
/// assert_eq!(format_millis(Duration::from_millis(250)), "250 ms");
/// assert_eq!(format_millis(Duration::from_secs(2)), "2000 ms");
/// ```
pub fn format_millis(elapsed: Duration) -> String {
    format!("{} ms", elapsed.as_millis())
}

/// Format a duration into a human-readable string
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use treebench::util::units::format_duration;
///
/// assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
/// assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let millis = duration.subsec_millis();

    if total_secs >= 3600 {
        let hours = total_secs / 3600;
        let minutes = (total_secs % 3600) / 60;
        let seconds = total_secs % 60;
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if total_secs >= 60 {
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{}m {}s", minutes, seconds)
    } else if total_secs > 0 {
        format!("{}.{:02}s", total_secs, millis / 10)
    } else {
        format!("{} ms", duration.as_millis())
    }
}
