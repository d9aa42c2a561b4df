//! Formatting of sizes, times and their changes
//!
//! The strings produced here end up verbatim in pull request comments. Signs,
//! rounding direction and the trailing 🔺/🔽 markers are part of the output format.

/// Marker appended to a change that makes things bigger or slower
pub const INCREASE: &str = "🔺";

/// Marker appended to a change that makes things smaller or faster
pub const DECREASE: &str = "🔽";

const UNITS: [&str; 6] = ["B", "kB", "MB", "GB", "TB", "PB"];

/// Format a byte count with decimal units
///
/// At most two decimals are kept and trailing zeros are dropped. Negative
/// values keep their sign, which is how shrinking deltas are rendered.
///
/// ```
/// use size_report_core::format::format_bytes;
///
/// assert_eq!(format_bytes(0.0), "0 B");
/// assert_eq!(format_bytes(500.0), "500 B");
/// assert_eq!(format_bytes(1200.0), "1.2 kB");
/// assert_eq!(format_bytes(-2_500_000.0), "-2.5 MB");
/// ```
pub fn format_bytes(bytes: f64) -> String {
    let magnitude = bytes.abs();

    let mut exponent = 0;
    while exponent < UNITS.len() - 1 && magnitude >= 1000f64.powi(exponent as i32 + 1) {
        exponent += 1;
    }

    // 999.995 kB rounds up to the next unit
    let rounded = (magnitude / 1000f64.powi(exponent as i32) * 100.0).round() / 100.0;
    if rounded >= 1000.0 && exponent < UNITS.len() - 1 {
        exponent += 1;
    }

    let value = bytes / 1000f64.powi(exponent as i32);
    format!("{} {}", trim_decimals(&format!("{:.2}", value)), UNITS[exponent])
}

/// Drop trailing zeros after the decimal point, and the point itself if nothing remains
fn trim_decimals(number: &str) -> String {
    let trimmed = if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    };

    match trimmed {
        "-0" => "0".to_string(),
        other => other.to_string(),
    }
}

/// Format a duration in seconds
///
/// One second and above is shown in seconds with one decimal, below that in
/// whole milliseconds. Both round up so a load cost is never understated.
pub fn format_time(seconds: f64) -> String {
    if seconds >= 1.0 {
        return format!("{} s", (seconds * 10.0).ceil() / 10.0);
    }

    format!("{} ms", (seconds * 1000.0).ceil())
}

/// Format the absolute size change between two measurements
///
/// Returns an empty string when the size did not change.
pub fn format_size_change(base: f64, current: f64) -> String {
    let delta = current - base;

    if delta > 0.0 {
        format!("+{} {}", format_bytes(delta), INCREASE)
    } else if delta < 0.0 {
        format!("{} {}", format_bytes(delta), DECREASE)
    } else {
        String::new()
    }
}

/// Format the relative change between two measurements as a percentage
///
/// A zero baseline always reads as a full increase. Otherwise the percentage is
/// rounded away from zero to two decimals.
pub fn format_change(base: f64, current: f64) -> String {
    if base == 0.0 {
        return format!("+100% {}", INCREASE);
    }

    let value = (current - base) / base * 100.0;

    if value > 0.0 {
        format!("+{}% {}", round_away_from_zero(value), INCREASE)
    } else if value < 0.0 {
        format!("{}% {}", round_away_from_zero(value), DECREASE)
    } else {
        "0%".to_string()
    }
}

fn round_away_from_zero(value: f64) -> f64 {
    value.signum() * (value.abs() * 100.0).ceil() / 100.0
}

/// Append a change annotation in parentheses, if there is one
pub fn format_line(value: &str, change: &str) -> String {
    if change.is_empty() {
        return value.to_string();
    }

    format!("{} ({})", value, change)
}
