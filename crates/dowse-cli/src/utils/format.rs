use std::time::Duration;

/// Formats a duration as `HH:MM:SS`, truncating sub-second precision.
pub fn hms(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

/// Formats `part` as a percentage of `whole` with one decimal, or `-` when `whole` is zero.
pub fn percent(part: usize, whole: usize) -> String {
    if whole == 0 {
        "-".to_string()
    } else {
        format!("{:.1}%", part as f64 / whole as f64 * 100.0)
    }
}
