/// Decides whether a token looks like a number.
///
/// A sign may only start the token or follow the exponent marker. At most one
/// decimal point, before any exponent, and at most one `e`/`E`. Everything else
/// must be an ASCII digit. Nothing in an empty token disqualifies it, so `""`
/// counts as a number.
pub fn is_number(token: &str) -> bool {
    let mut has_decimal_point = false;
    let mut has_exponent = false;
    let mut leading = true;

    for c in token.chars() {
        if std::mem::take(&mut leading) && matches!(c, '+' | '-') {
            continue;
        }

        match c {
            '.' => {
                if has_decimal_point || has_exponent {
                    return false;
                }
                has_decimal_point = true;
            }
            'e' | 'E' => {
                if has_exponent {
                    return false;
                }
                has_exponent = true;
                leading = true;
            }
            c if c.is_ascii_digit() => {}
            _ => return false,
        }
    }

    true
}

/// Converts a token that passes [`is_number`].
///
/// Some tokens pass the check without naming a value (`""`, `"-"`, `"1e"`);
/// those yield `None` as well.
pub fn parse_number(token: &str) -> Option<f64> {
    if is_number(token) { token.parse().ok() } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_numbers() {
        for token in ["3.14", "-2", "1e10", "+5.2E-3", "0", ".5", "5.", "1e+5", "007"] {
            assert!(is_number(token), "{token}");
        }
    }

    #[test]
    fn rejects_malformed() {
        for token in ["1.2.3", "1e1e1", "abc", "1-2", "1e2.5", "--1", "+-1", "1 2", "inf", "NaN"] {
            assert!(!is_number(token), "{token}");
        }
    }

    #[test]
    fn empty_token_is_a_number() {
        assert!(is_number(""));
        assert_eq!(parse_number(""), None);
    }

    #[test]
    fn degenerate_tokens_have_no_value() {
        for token in ["-", "+", ".", "e", "1e", "-e5"] {
            assert!(is_number(token), "{token}");
            assert_eq!(parse_number(token), None, "{token}");
        }
    }

    #[test]
    fn parses_values() {
        assert_eq!(parse_number("2.75"), Some(2.75));
        assert_eq!(parse_number("+5.2E-3"), Some(0.0052));
        assert_eq!(parse_number("-2"), Some(-2.0));
        assert_eq!(parse_number("1e10"), Some(1e10));
        assert_eq!(parse_number("abc"), None);
    }
}
