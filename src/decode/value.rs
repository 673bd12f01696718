//! Best-effort string → scalar coercion

use crate::storage::Value;

/// Coerce a token to the most specific scalar that round-trips
///
/// Tries a base-10 `i64`, then an `f64`, then keeps the string. `None` (the
/// source format's absent marker) passes through as [`Value::Null`]. Never
/// fails: a token that is not a number is simply a string.
///
/// # Example
///
/// ```
/// use netconv::{parse_value, Value};
///
/// assert_eq!(parse_value(Some("42")), Value::Int(42));
/// assert_eq!(parse_value(Some("3.25")), Value::Float(3.25));
/// assert_eq!(parse_value(Some("abc")), Value::Str("abc".into()));
/// assert_eq!(parse_value(None), Value::Null);
/// ```
#[must_use]
pub fn parse_value(token: Option<&str>) -> Value {
    let Some(s) = token else {
        return Value::Null;
    };

    if let Ok(v) = s.parse::<i64>() {
        return Value::Int(v);
    }
    if let Ok(v) = s.parse::<f64>() {
        return Value::Float(v);
    }
    Value::Str(s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer() {
        assert_eq!(parse_value(Some("42")), Value::Int(42));
        assert_eq!(parse_value(Some("-7")), Value::Int(-7));
        assert_eq!(parse_value(Some("+3")), Value::Int(3));
    }

    #[test]
    fn test_float() {
        assert_eq!(parse_value(Some("3.25")), Value::Float(3.25));
        assert_eq!(parse_value(Some("1e3")), Value::Float(1000.0));
        assert_eq!(parse_value(Some(".5")), Value::Float(0.5));
    }

    #[test]
    fn test_integer_overflow_falls_back_to_float() {
        assert_eq!(
            parse_value(Some("99999999999999999999")),
            Value::Float(1e20)
        );
    }

    #[test]
    fn test_string_fallback() {
        assert_eq!(parse_value(Some("abc")), Value::Str("abc".into()));
        assert_eq!(parse_value(Some("")), Value::Str(String::new()));
        // No whitespace tolerance
        assert_eq!(parse_value(Some(" 42")), Value::Str(" 42".into()));
    }

    #[test]
    fn test_absent_passthrough() {
        assert_eq!(parse_value(None), Value::Null);
    }
}
