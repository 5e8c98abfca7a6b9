//! Destination classification
//!
//! Decides whether the `to` of a call is a phone number or the name of a
//! registered client. This is a heuristic, not E.164 validation: a destination
//! is a phone number when it (minus one leading `+`) reads as a numeric
//! literal under the loose string-to-number rules client SDKs apply. Notably
//! an empty remainder counts as numeric, so `"+ "` is a number while `"+"` on
//! its own is a client name.

use tracing::trace;

use crate::types::DestinationKind;

/// Classify a raw destination. Total: anything unparseable is a client name.
pub fn classify(to: &str) -> DestinationKind {
    let numeric = if to.chars().count() == 1 {
        is_numeric_literal(to)
    } else if let Some(rest) = to.strip_prefix('+') {
        is_numeric_literal(rest)
    } else {
        is_numeric_literal(to)
    };

    let kind = if numeric {
        DestinationKind::PhoneNumber
    } else {
        DestinationKind::ClientName
    };
    trace!(to, ?kind, "Classified destination");
    kind
}

/// Whether `s` converts to a number (including infinities) rather than NaN
pub fn is_numeric_literal(s: &str) -> bool {
    let s = s.trim_matches(is_js_whitespace);
    if s.is_empty() {
        return true;
    }

    if let Some((digits, radix)) = non_decimal_digits(s) {
        return !digits.is_empty() && digits.chars().all(|c| c.is_digit(radix));
    }

    let unsigned = s.strip_prefix(['+', '-']).unwrap_or(s);
    unsigned == "Infinity" || is_decimal_literal(unsigned)
}

fn non_decimal_digits(s: &str) -> Option<(&str, u32)> {
    let bytes = s.as_bytes();
    if bytes.len() < 2 || bytes[0] != b'0' {
        return None;
    }
    let radix = match bytes[1] {
        b'x' | b'X' => 16,
        b'o' | b'O' => 8,
        b'b' | b'B' => 2,
        _ => return None,
    };
    Some((&s[2..], radix))
}

// digits [ "." digits? ] [exponent] | "." digits [exponent]
fn is_decimal_literal(s: &str) -> bool {
    let (mantissa, exponent) = match s.find(['e', 'E']) {
        Some(idx) => (&s[..idx], Some(&s[idx + 1..])),
        None => (s, None),
    };

    let (int_part, frac_part) = match mantissa.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (mantissa, ""),
    };
    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if int_part.is_empty() && frac_part.is_empty() {
        return false;
    }
    if !all_digits(int_part) || !all_digits(frac_part) {
        return false;
    }

    match exponent {
        None => true,
        Some(exp) => {
            let exp = exp.strip_prefix(['+', '-']).unwrap_or(exp);
            !exp.is_empty() && all_digits(exp)
        }
    }
}

fn is_js_whitespace(c: char) -> bool {
    matches!(
        c,
        '\u{0009}' | '\u{000A}' | '\u{000B}' | '\u{000C}' | '\u{000D}' | '\u{0020}'
            | '\u{00A0}' | '\u{1680}' | '\u{2000}'..='\u{200A}' | '\u{2028}' | '\u{2029}'
            | '\u{202F}' | '\u{205F}' | '\u{3000}' | '\u{FEFF}'
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use DestinationKind::*;

    #[test]
    fn test_phone_numbers() {
        assert_eq!(classify("5"), PhoneNumber);
        assert_eq!(classify("+15551234567"), PhoneNumber);
        assert_eq!(classify("15551234567"), PhoneNumber);
        assert_eq!(classify("0"), PhoneNumber);
    }

    #[test]
    fn test_client_names() {
        assert_eq!(classify("alice"), ClientName);
        assert_eq!(classify("+abc"), ClientName);
        assert_eq!(classify("a"), ClientName);
        assert_eq!(classify("555-1234"), ClientName);
        assert_eq!(classify("client:bob"), ClientName);
        assert_eq!(classify("+1 555 123"), ClientName);
    }

    #[test]
    fn test_single_character_plus_is_client() {
        // Length one is checked before the '+' strip.
        assert_eq!(classify("+"), ClientName);
        assert_eq!(classify("+ "), PhoneNumber);
    }

    #[test]
    fn test_loose_numeric_forms() {
        assert_eq!(classify("1e5"), PhoneNumber);
        assert_eq!(classify("0x1F"), PhoneNumber);
        assert_eq!(classify(" 42 "), PhoneNumber);
        assert_eq!(classify("+-5"), PhoneNumber);
        assert_eq!(classify("Infinity"), PhoneNumber);
        assert_eq!(classify("1.5"), PhoneNumber);
        assert_eq!(classify(""), PhoneNumber);
        assert_eq!(classify(" "), PhoneNumber);
    }

    #[test]
    fn test_not_numeric() {
        assert!(!is_numeric_literal("infinity"));
        assert!(!is_numeric_literal("NaN"));
        assert!(!is_numeric_literal("1_000"));
        assert!(!is_numeric_literal("0x"));
        assert!(!is_numeric_literal("-0x10"));
        assert!(!is_numeric_literal("."));
        assert!(!is_numeric_literal("1e"));
        assert!(!is_numeric_literal("12abc"));
        assert!(!is_numeric_literal("1.2.3"));
    }

    #[test]
    fn test_classification_is_stable() {
        for to in ["bob", "+15551234567", "7", ""] {
            assert_eq!(classify(to), classify(to));
        }
    }
}
