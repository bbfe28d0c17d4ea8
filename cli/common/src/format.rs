//! Human-readable formatting for run summaries.

const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];

/// Format a byte count using binary units.
///
/// # Examples
///
/// ```
/// use rf_cli_common::format_bytes;
///
/// assert_eq!(format_bytes(500), "500 bytes");
/// assert_eq!(format_bytes(1536), "1.50 KB");
/// assert_eq!(format_bytes(1_073_741_824), "1.00 GB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{bytes} bytes");
    }

    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit + 1 < UNITS.len() {
        value /= 1024.0;
        unit += 1;
    }

    format!("{value:.2} {}", UNITS[unit])
}

/// Format a count with thousands separators.
///
/// # Examples
///
/// ```
/// use rf_cli_common::format_number;
///
/// assert_eq!(format_number(999), "999");
/// assert_eq!(format_number(1234567), "1,234,567");
/// ```
pub fn format_number(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }

    out
}

/// Format milliseconds as seconds with two decimals.
pub fn format_duration_ms(ms: i64) -> String {
    format!("{:.2}s", ms as f64 / 1000.0)
}
