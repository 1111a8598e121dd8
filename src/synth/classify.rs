//! Heuristic classifiers for primitive JSON values.
//!
//! Each string detector is an independent predicate; [`classify_string`]
//! runs them in priority order and returns the first hit. Keeping the
//! classifiers pure makes them trivial to unit-test and extend without
//! touching the recursion in `synth`.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::Scalar;

/// Strings longer than this are treated as opaque blobs.
pub const LARGE_TEXT_THRESHOLD: usize = 1000;

// ISO 8601 with `T` separator, or SQL-style `YYYY-MM-DD hh:mm:ss`.
static TIMESTAMP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}[T ]\d{2}:\d{2}:\d{2}(\.\d+)?(Z|[+-]\d{2}:\d{2})?$").unwrap()
});

// Decimal seconds ("1.5s") or a narrow ISO 8601 duration form.
static DURATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+(\.\d+)?s|PT\d+H\d+M\d+S)$").unwrap());

static UUID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .unwrap()
});

static URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://[A-Za-z0-9][A-Za-z0-9.-]*(:\d+)?(/\S*)?$").unwrap());

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").unwrap());

/// What a string value looks like, first match wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringClass {
    Timestamp,
    Duration,
    Uuid,
    Url,
    Email,
    LargeText,
    Plain,
}

pub fn classify_string(s: &str) -> StringClass {
    if TIMESTAMP_RE.is_match(s) {
        StringClass::Timestamp
    } else if DURATION_RE.is_match(s) {
        StringClass::Duration
    } else if UUID_RE.is_match(s) {
        StringClass::Uuid
    } else if URL_RE.is_match(s) {
        StringClass::Url
    } else if EMAIL_RE.is_match(s) {
        StringClass::Email
    } else if s.len() > LARGE_TEXT_THRESHOLD {
        StringClass::LargeText
    } else {
        StringClass::Plain
    }
}

/// Numeric sizing: scalar plus the comment it carries, if any.
pub fn classify_number(n: &serde_json::Number) -> (Scalar, Option<&'static str>) {
    if let Some(i) = n.as_i64() {
        return classify_integer(i);
    }
    if n.as_u64().is_some() {
        // beyond i64 → definitely a large integer
        return (Scalar::Int64, Some("Large integer"));
    }
    let f = n.as_f64().unwrap_or(0.0);
    if f.abs() < 3.4e38 {
        (Scalar::Float, None)
    } else {
        (Scalar::Double, None)
    }
}

fn classify_integer(v: i64) -> (Scalar, Option<&'static str>) {
    if (0..=i64::from(i32::MAX)).contains(&v) {
        (Scalar::Int32, None)
    } else if (i64::from(i32::MAX) + 1..=i64::from(u32::MAX)).contains(&v) {
        (Scalar::Uint32, Some("Unsigned integer"))
    } else if (i64::from(i32::MIN)..0).contains(&v) {
        (Scalar::Int32, None)
    } else {
        (Scalar::Int64, Some("Large integer"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn num(v: serde_json::Value) -> serde_json::Number {
        v.as_number().unwrap().clone()
    }

    #[test]
    fn integer_boundaries() {
        assert_eq!(classify_number(&num(json!(2147483647))).0, Scalar::Int32);
        assert_eq!(
            classify_number(&num(json!(2147483648u64))),
            (Scalar::Uint32, Some("Unsigned integer"))
        );
        assert_eq!(classify_number(&num(json!(4294967295u64))).0, Scalar::Uint32);
        assert_eq!(
            classify_number(&num(json!(4294967296u64))),
            (Scalar::Int64, Some("Large integer"))
        );
        assert_eq!(classify_number(&num(json!(-1))).0, Scalar::Int32);
        assert_eq!(classify_number(&num(json!(-2147483648i64))).0, Scalar::Int32);
        assert_eq!(
            classify_number(&num(json!(-2147483649i64))),
            (Scalar::Int64, Some("Large integer"))
        );
        assert_eq!(
            classify_number(&num(json!(9223372036854775808u64))),
            (Scalar::Int64, Some("Large integer"))
        );
    }

    #[test]
    fn float_vs_double() {
        assert_eq!(classify_number(&num(json!(1.5))).0, Scalar::Float);
        assert_eq!(classify_number(&num(json!(1e40))).0, Scalar::Double);
        assert_eq!(classify_number(&num(json!(-1e40))).0, Scalar::Double);
    }

    #[test]
    fn timestamp_shapes() {
        assert_eq!(classify_string("2024-01-01T00:00:00Z"), StringClass::Timestamp);
        assert_eq!(classify_string("2024-01-01T00:00:00.123+02:00"), StringClass::Timestamp);
        assert_eq!(classify_string("2024-01-01 12:30:45"), StringClass::Timestamp);
        assert_eq!(classify_string("2024-01-01"), StringClass::Plain);
    }

    #[test]
    fn duration_shapes() {
        assert_eq!(classify_string("30s"), StringClass::Duration);
        assert_eq!(classify_string("1.5s"), StringClass::Duration);
        assert_eq!(classify_string("PT1H30M0S"), StringClass::Duration);
        assert_eq!(classify_string("30 seconds"), StringClass::Plain);
    }

    #[test]
    fn uuid_url_email_order() {
        assert_eq!(
            classify_string("550e8400-e29b-41d4-a716-446655440000"),
            StringClass::Uuid
        );
        assert_eq!(classify_string("https://example.com/a/b?x=1"), StringClass::Url);
        assert_eq!(classify_string("ftp://example.com"), StringClass::Plain);
        assert_eq!(classify_string("a@b.com"), StringClass::Email);
        assert_eq!(classify_string("not an email @"), StringClass::Plain);
    }

    #[test]
    fn oversized_strings_become_large_text() {
        let s = "x".repeat(LARGE_TEXT_THRESHOLD + 1);
        assert_eq!(classify_string(&s), StringClass::LargeText);
        let s = "x".repeat(LARGE_TEXT_THRESHOLD);
        assert_eq!(classify_string(&s), StringClass::Plain);
    }
}
