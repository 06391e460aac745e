//! Display formatting for durations and counts.

/// Suffixes for successive powers of 1000.
const SUFFIXES: [&str; 5] = ["", "K", "M", "B", "T"];

/// Format a duration in seconds as `MM:SS`, or `HH:MM:SS` when it spans an hour.
///
/// Hours are not wrapped at 24.
#[must_use]
pub fn format_length(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}

/// Abbreviate a count with a K/M/B/T suffix and one decimal place.
///
/// Counts below 1000 are printed unchanged; a trailing `.0` is dropped.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn humanize_number(count: u64) -> String {
    if count < 1000 {
        return count.to_string();
    }

    let mut value = count as f64;
    let mut idx = 0;
    while value >= 1000.0 && idx < SUFFIXES.len() - 1 {
        value /= 1000.0;
        idx += 1;
    }

    let mut rounded = (value * 10.0).round() / 10.0;
    // 999.96K rounds up to 1000.0K
    if rounded >= 1000.0 && idx < SUFFIXES.len() - 1 {
        rounded /= 1000.0;
        idx += 1;
    }

    let text = format!("{rounded:.1}");
    let text = text.strip_suffix(".0").unwrap_or(&text);
    format!("{text}{}", SUFFIXES[idx])
}
