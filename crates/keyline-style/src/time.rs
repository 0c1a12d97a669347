//! CSS `<time>` value conversions.

/// Parse a CSS time value (`"2s"`, `"150ms"`) into milliseconds.
///
/// Bare numbers are treated as milliseconds. Unparseable input yields `0.0` —
/// an undeclared or half-typed duration means "no time", never an error.
pub fn parse_time_ms(value: &str) -> f64 {
    let value = value.trim();
    if let Some(seconds) = value.strip_suffix("ms").map_or_else(
        || value.strip_suffix(['s', 'S']).map(|n| (n, 1000.0)),
        |n| Some((n, 1.0)),
    ) {
        let (number, scale) = seconds;
        return number.trim().parse::<f64>().map_or(0.0, |n| n * scale);
    }
    value.parse::<f64>().unwrap_or(0.0)
}

/// Format a millisecond count as CSS time text.
///
/// Whole-second values print as `"2s"`, everything else as `"150ms"`. The
/// text-patch engine writes these back into the source, so the output stays
/// in the units an author would have typed.
pub fn format_time_ms(ms: f64) -> String {
    if ms != 0.0 && ms % 1000.0 == 0.0 {
        format!("{}s", ms / 1000.0)
    } else {
        format!("{ms}ms")
    }
}
