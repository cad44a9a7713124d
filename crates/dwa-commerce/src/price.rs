//! Price-range parsing.
//!
//! Catalog prices are text ranges such as `"₵10 - ₵20"`. Only the lower
//! bound is used for pricing. The currency symbol is stripped rather than
//! matched, so every encoding of it seen in stored records (`₵`, the
//! mis-decoded `â‚µ`, `GH₵`) parses the same way.

/// Separator between the two bounds of a price range.
pub const PRICE_RANGE_SEPARATOR: &str = " - ";

/// Parse the lower bound of a price range.
///
/// Returns `None` when the separator is missing or the first segment has no
/// leading number once the symbol is removed.
pub fn try_parse_lower_price(price_range: &str) -> Option<f64> {
    let (lower, _) = price_range.split_once(PRICE_RANGE_SEPARATOR)?;
    parse_decimal_prefix(strip_symbol(lower))
}

/// Drop the currency symbol in front of the first digit.
///
/// A `.` or sign directly before the digits stays with the number (`.5`,
/// `-4`) unless a letter precedes it, in which case it belongs to the
/// symbol (`Rs.10`, `GH-10`).
fn strip_symbol(segment: &str) -> &str {
    let Some(first_digit) = segment.find(|c: char| c.is_ascii_digit()) else {
        return "";
    };

    let mut symbol = &segment[..first_digit];
    if let Some(rest) = symbol.strip_suffix('.') {
        symbol = rest;
    }
    if let Some(rest) = symbol.strip_suffix(|c: char| c == '-' || c == '+') {
        symbol = rest;
    }

    if symbol.ends_with(|c: char| c.is_ascii_alphabetic()) {
        &segment[first_digit..]
    } else {
        &segment[symbol.len()..]
    }
}

/// Parse the lower bound of a price range, or return `fallback`.
///
/// Never fails: missing input, a missing separator and non-numeric text all
/// yield `fallback`.
pub fn parse_lower_price(price_range: Option<&str>, fallback: f64) -> f64 {
    price_range
        .and_then(try_parse_lower_price)
        .unwrap_or(fallback)
}

/// Parse the longest leading decimal number of `text`, ignoring leading
/// whitespace and any trailing garbage (`"35abc"` is 35).
pub(crate) fn parse_decimal_prefix(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    text[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse the longest leading integer of `text` (`"3.7"` is 3).
pub(crate) fn parse_integer_prefix(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return None;
    }
    text[..end].parse::<i64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lower_bound_of_valid_ranges() {
        assert_eq!(try_parse_lower_price("\u{20b5}10 - \u{20b5}20"), Some(10.0));
        assert_eq!(try_parse_lower_price("\u{20b5}2.50 - \u{20b5}8"), Some(2.5));
        assert_eq!(try_parse_lower_price("GH\u{20b5}7 - GH\u{20b5}9"), Some(7.0));
        assert_eq!(try_parse_lower_price("12 - 15"), Some(12.0));
    }

    #[test]
    fn test_both_symbol_encodings_parse_alike() {
        let clean = try_parse_lower_price("\u{20b5}10 - \u{20b5}20");
        let mojibake = try_parse_lower_price("\u{e2}\u{201a}\u{b5}10 - \u{e2}\u{201a}\u{b5}20");
        assert_eq!(clean, mojibake);
    }

    #[test]
    fn test_punctuated_symbols_are_stripped() {
        assert_eq!(try_parse_lower_price("Rs.10 - Rs.20"), Some(10.0));
        assert_eq!(try_parse_lower_price("GH-10 - GH-20"), Some(10.0));
        assert_eq!(try_parse_lower_price("GHS+3.5 - GHS+9"), Some(3.5));
    }

    #[test]
    fn test_leading_point_and_sign_stay_with_number() {
        assert_eq!(try_parse_lower_price("\u{20b5}.5 - \u{20b5}2"), Some(0.5));
        assert_eq!(try_parse_lower_price("-4 - 8"), Some(-4.0));
        assert_eq!(try_parse_lower_price("\u{20b5}-.5 - \u{20b5}2"), Some(-0.5));
    }

    #[test]
    fn test_malformed_ranges_fall_back() {
        assert_eq!(parse_lower_price(None, 5.0), 5.0);
        assert_eq!(parse_lower_price(Some(""), 5.0), 5.0);
        assert_eq!(parse_lower_price(Some("\u{20b5}10"), 5.0), 5.0);
        assert_eq!(parse_lower_price(Some("\u{20b5}abc - \u{20b5}20"), 0.0), 0.0);
        assert_eq!(parse_lower_price(Some(" - \u{20b5}20"), 3.0), 3.0);
        assert_eq!(parse_lower_price(Some("\u{20b5}. - \u{20b5}20"), 3.0), 3.0);
    }

    #[test]
    fn test_decimal_prefix() {
        assert_eq!(parse_decimal_prefix("35"), Some(35.0));
        assert_eq!(parse_decimal_prefix("  35.25abc"), Some(35.25));
        assert_eq!(parse_decimal_prefix(".5"), Some(0.5));
        assert_eq!(parse_decimal_prefix("5."), Some(5.0));
        assert_eq!(parse_decimal_prefix("1e2"), Some(100.0));
        assert_eq!(parse_decimal_prefix("-4"), Some(-4.0));
        assert_eq!(parse_decimal_prefix(""), None);
        assert_eq!(parse_decimal_prefix("abc"), None);
        assert_eq!(parse_decimal_prefix("-"), None);
    }

    #[test]
    fn test_integer_prefix() {
        assert_eq!(parse_integer_prefix("3"), Some(3));
        assert_eq!(parse_integer_prefix("3.7"), Some(3));
        assert_eq!(parse_integer_prefix("-5"), Some(-5));
        assert_eq!(parse_integer_prefix("x3"), None);
        assert_eq!(parse_integer_prefix(""), None);
    }
}
