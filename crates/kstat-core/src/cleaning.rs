//! String cleaning for display-formatted export cells.
//!
//! K-stat exports label years with a trailing `년` unit marker and write
//! numeric quantities with comma digit grouping. These helpers undo that
//! formatting ahead of numeric parsing; they never substitute sentinel
//! values for cells that fail to parse.

/// Strip one trailing unit token from a field's textual value.
///
/// The value is passed through unchanged (apart from outer whitespace) when
/// the suffix is absent, so already-clean values survive a second pass.
///
/// # Examples
///
/// ```
/// use kstat_core::cleaning::strip_unit_suffix;
///
/// assert_eq!(strip_unit_suffix("2025년", "년"), "2025");
/// assert_eq!(strip_unit_suffix(" 2024년 ", "년"), "2024");
/// assert_eq!(strip_unit_suffix("2023", "년"), "2023");
/// ```
pub fn strip_unit_suffix<'a>(value: &'a str, suffix: &str) -> &'a str {
    let trimmed = value.trim();
    match trimmed.strip_suffix(suffix) {
        Some(stripped) => stripped.trim_end(),
        None => trimmed,
    }
}

/// Remove comma digit-group separators from a numeric-looking string.
///
/// Applied only to columns declared numeric, never to a resolved axis.
///
/// # Examples
///
/// ```
/// use kstat_core::cleaning::strip_thousands_separators;
///
/// assert_eq!(strip_thousands_separators("1,234,567"), "1234567");
/// assert_eq!(strip_thousands_separators("-532"), "-532");
/// ```
pub fn strip_thousands_separators(value: &str) -> String {
    value.trim().replace(',', "")
}

/// Parse an integer year from a possibly unit-labeled cell.
pub fn parse_year(value: &str, suffix: Option<&str>) -> Option<i32> {
    let cleaned = match suffix {
        Some(suffix) => strip_unit_suffix(value, suffix),
        None => value.trim(),
    };
    cleaned.parse().ok()
}

/// Parse a floating-point quantity from a thousands-separated cell.
///
/// Non-finite parses are rejected; trade quantities are always finite.
pub fn parse_quantity(value: &str) -> Option<f64> {
    strip_thousands_separators(value)
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}
