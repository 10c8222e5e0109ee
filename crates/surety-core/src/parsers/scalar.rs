//! Scalar parsers.

use std::str::FromStr;

use crate::error::ParseFailed;

/// `true`/`yes` → `true`, `false`/`no` → `false`, case-insensitive.
pub fn parse_boolean(response: &str) -> Result<bool, ParseFailed> {
    match response.trim().to_lowercase().as_str() {
        "true" | "yes" => Ok(true),
        "false" | "no" => Ok(false),
        _ => Err(ParseFailed::new(response)),
    }
}

/// A float literal such as `3.14`, `-2.5` or `1e3`.
pub fn parse_float(response: &str) -> Result<f64, ParseFailed> {
    parse_trimmed(response)
}

/// An integer literal. `3.0` is rejected.
///
/// The value must fit in an `i64`; larger literals are a [`ParseFailed`].
/// Use [`parse_number`] for other widths, e.g. `parse_number::<i128>`.
pub fn parse_integer(response: &str) -> Result<i64, ParseFailed> {
    parse_trimmed(response)
}

/// Any [`FromStr`] number type, after trimming.
///
/// ```
/// use surety_core::parsers::parse_number;
///
/// assert_eq!(parse_number::<u128>(" 340282366920938463463 "), Ok(340282366920938463463));
/// ```
pub fn parse_number<N: FromStr>(response: &str) -> Result<N, ParseFailed> {
    parse_trimmed(response)
}

/// The trimmed response text. Never fails.
pub fn parse_string(response: &str) -> Result<String, ParseFailed> {
    Ok(response.trim().to_string())
}

fn parse_trimmed<N: FromStr>(response: &str) -> Result<N, ParseFailed> {
    response
        .trim()
        .parse()
        .map_err(|_| ParseFailed::new(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boolean_true_and_yes() {
        for input in ["true", "True", "yes", "YES", "TrUe", "YeS"] {
            assert_eq!(parse_boolean(input), Ok(true), "input: {input}");
        }
    }

    #[test]
    fn test_boolean_false_and_no() {
        for input in ["false", "no", "NO", "FaLsE"] {
            assert_eq!(parse_boolean(input), Ok(false), "input: {input}");
        }
    }

    #[test]
    fn test_boolean_ignores_whitespace() {
        assert_eq!(parse_boolean("  yes \n"), Ok(true));
        assert_eq!(parse_boolean("\t no \t"), Ok(false));
    }

    #[test]
    fn test_boolean_rejects_other_words() {
        let err = parse_boolean("maybe").unwrap_err();
        assert_eq!(err.response(), "maybe");
        assert!(parse_boolean("y").is_err());
        assert!(parse_boolean("").is_err());
    }

    #[test]
    fn test_float_basic_and_scientific() {
        assert_eq!(parse_float("3.14"), Ok(3.14));
        assert_eq!(parse_float("1e3"), Ok(1000.0));
        assert_eq!(parse_float("-2.5"), Ok(-2.5));
        assert_eq!(parse_float("  42.0 \n"), Ok(42.0));
    }

    #[test]
    fn test_float_rejects_garbage() {
        assert!(parse_float("abc").is_err());
        assert!(parse_float("1.2.3").is_err());
        assert!(parse_float("").is_err());
    }

    #[test]
    fn test_integer_basic_and_negative() {
        assert_eq!(parse_integer("7"), Ok(7));
        assert_eq!(parse_integer("-12"), Ok(-12));
        assert_eq!(parse_integer("  15 \t"), Ok(15));
    }

    #[test]
    fn test_integer_rejects_float_literal() {
        assert!(parse_integer("3.0").is_err());
        assert!(parse_integer("ten").is_err());
    }

    #[test]
    fn test_integer_beyond_i64_needs_wider_type() {
        let big = "123456789012345678901234567890";
        let err = parse_integer(big).unwrap_err();
        assert_eq!(err.response(), big);
        assert_eq!(
            parse_number::<i128>(&format!(" {big} ")),
            Ok(123456789012345678901234567890)
        );
        assert!(parse_number::<u8>("256").is_err());
    }

    #[test]
    fn test_zero_is_not_a_failure() {
        assert_eq!(parse_integer("0"), Ok(0));
        assert_eq!(parse_float("0.0"), Ok(0.0));
    }

    #[test]
    fn test_string_trims() {
        assert_eq!(parse_string("  Paris \n"), Ok("Paris".to_string()));
        assert_eq!(parse_string(""), Ok(String::new()));
    }
}
