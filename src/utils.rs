//! Number formatting in the fixed id-ID style: thousands grouped with dots,
//! sign carried as a plain leading `-`.

/// Format an integer with dot thousand-separators, e.g. `-50000000000`
/// becomes `"-50.000.000.000"`.
pub fn format_with_dots(value: i64) -> String {
    // i64::MIN has no i64 absolute value
    let magnitude = (value as i128).unsigned_abs();
    let grouped = group_digit_string(&magnitude.to_string());
    if value < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// As-you-type formatter for a monetary field: keeps a leading `-`, strips
/// every non-digit, drops leading zeros, regroups with dots. An input with no
/// digits formats to the empty string.
pub fn group_digits(raw: &str) -> String {
    let sign = if raw.starts_with('-') { "-" } else { "" };
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return String::new();
    }
    let normalized = digits.trim_start_matches('0');
    let normalized = if normalized.is_empty() { "0" } else { normalized };
    format!("{sign}{}", group_digit_string(normalized))
}

/// Parse a dot-grouped monetary string back to an integer. All non-digit
/// characters are stripped; the sign is taken from a leading `-` only. An
/// empty or unparseable value yields 0.
pub fn parse_formatted(value: &str) -> i64 {
    let negative = value.starts_with('-');
    let digits: String = value.chars().filter(|c| c.is_ascii_digit()).collect();
    let magnitude = digits.parse::<i64>().unwrap_or(0);
    if negative {
        -magnitude
    } else {
        magnitude
    }
}

/// Permissive numeric parse for shareable-link parameters: keeps digits, `.`
/// and `-`, parses as a float and truncates toward zero. Returns `None` when
/// nothing numeric remains.
pub fn parse_loose(value: &str) -> Option<i64> {
    let cleaned: String = value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    let parsed = cleaned.parse::<f64>().ok()?;
    if !parsed.is_finite() {
        return None;
    }
    Some(parsed.trunc() as i64)
}

fn group_digit_string(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    let len = digits.len();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_with_dot_grouping() {
        assert_eq!(format_with_dots(0), "0");
        assert_eq!(format_with_dots(999), "999");
        assert_eq!(format_with_dots(1000), "1.000");
        assert_eq!(format_with_dots(50_000_000_000), "50.000.000.000");
        assert_eq!(format_with_dots(-50_000_000_000), "-50.000.000.000");
    }

    #[test]
    fn parse_format_round_trip() {
        for n in [0i64, 1, 999, 1000, 123_456, 50_000_000_000, 9_876_543_210_123] {
            assert_eq!(parse_formatted(&format_with_dots(n)), n);
        }
    }

    #[test]
    fn sign_survives_grouping() {
        assert_eq!(parse_formatted("-50.000.000.000"), -50_000_000_000);
        assert_eq!(format_with_dots(parse_formatted("-50.000.000.000")), "-50.000.000.000");
    }

    #[test]
    fn parse_formatted_defaults_to_zero() {
        assert_eq!(parse_formatted(""), 0);
        assert_eq!(parse_formatted("-"), 0);
        assert_eq!(parse_formatted("Rp"), 0);
    }

    #[test]
    fn group_digits_normalizes_partial_input() {
        assert_eq!(group_digits("50000"), "50.000");
        assert_eq!(group_digits("-50000"), "-50.000");
        assert_eq!(group_digits("1.2.3"), "123");
        assert_eq!(group_digits("007000"), "7.000");
        assert_eq!(group_digits(""), "");
        assert_eq!(group_digits("-"), "");
        assert_eq!(group_digits("abc"), "");
        assert_eq!(group_digits("000"), "0");
    }

    #[test]
    fn parse_loose_strips_noise() {
        assert_eq!(parse_loose("50000000000"), Some(50_000_000_000));
        assert_eq!(parse_loose("-1234"), Some(-1234));
        assert_eq!(parse_loose("12.5"), Some(12));
        assert_eq!(parse_loose("Rp 7000"), Some(7000));
        assert_eq!(parse_loose("abc"), None);
        assert_eq!(parse_loose(""), None);
    }
}
