//! Decimal literal parsing for form input.
//!
//! Form fields arrive as free text. These helpers accept plain decimal
//! notation only, so values such as `NaN`, `inf` or `0x10` never reach the
//! range checks as numbers.

use once_cell::sync::Lazy;
use regex::Regex;

static UNSIGNED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?\d+$").expect("valid unsigned regex"));
static DECIMAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?$").expect("valid decimal regex")
});

/// A non-negative whole number read from form text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unsigned {
    Value(u64),
    /// Well-formed, but larger than `u64::MAX`.
    Overflow,
}

/// Parses a non-negative whole number, ignoring surrounding whitespace.
///
/// Returns `None` for blank input, negative or fractional values and
/// anything that is not a plain decimal integer.
pub fn parse_unsigned(raw: &str) -> Option<Unsigned> {
    let trimmed = raw.trim();
    if !UNSIGNED_RE.is_match(trimmed) {
        return None;
    }
    // The pattern admits digits only, so a parse failure is an overflow.
    Some(
        trimmed
            .parse::<u64>()
            .map_or(Unsigned::Overflow, Unsigned::Value),
    )
}

/// Parses a finite decimal number, ignoring surrounding whitespace.
pub fn parse_decimal(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if !DECIMAL_RE.is_match(trimmed) {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|value| value.is_finite())
}

#[cfg(test)]
mod tests {
    use super::{parse_decimal, parse_unsigned, Unsigned};

    #[test]
    fn unsigned_accepts_whole_numbers_only() {
        assert_eq!(parse_unsigned(" 42 "), Some(Unsigned::Value(42)));
        assert_eq!(parse_unsigned("+3"), Some(Unsigned::Value(3)));
        assert_eq!(parse_unsigned("0"), Some(Unsigned::Value(0)));
        assert_eq!(parse_unsigned("5000000000"), Some(Unsigned::Value(5_000_000_000)));
        assert_eq!(parse_unsigned("-7"), None);
        assert_eq!(parse_unsigned("5.5"), None);
        assert_eq!(parse_unsigned("1e3"), None);
        assert_eq!(parse_unsigned(""), None);
    }

    #[test]
    fn unsigned_reports_overflow_separately() {
        assert_eq!(
            parse_unsigned("18446744073709551615"),
            Some(Unsigned::Value(u64::MAX))
        );
        assert_eq!(
            parse_unsigned("18446744073709551616"),
            Some(Unsigned::Overflow)
        );
    }

    #[test]
    fn decimal_rejects_non_literal_floats() {
        assert_eq!(parse_decimal("12.5"), Some(12.5));
        assert_eq!(parse_decimal("-.5"), Some(-0.5));
        assert_eq!(parse_decimal("7."), Some(7.0));
        assert_eq!(parse_decimal("1e2"), Some(100.0));
        assert_eq!(parse_decimal("NaN"), None);
        assert_eq!(parse_decimal("inf"), None);
        assert_eq!(parse_decimal("0x10"), None);
        assert_eq!(parse_decimal("1e999"), None);
        assert_eq!(parse_decimal("12,5"), None);
    }
}
