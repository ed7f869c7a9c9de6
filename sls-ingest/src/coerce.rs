//! Field coercion
//!
//! Converts heterogeneously encoded record values into the types the
//! canonical event needs. Every accepted encoding is listed explicitly;
//! anything else fails closed.

use crate::record::{FieldValue, Record};
use sls_common::{Error, Result};

/// Sentinel returned by [`extract_int`] for an optional field that was not provided
pub const NOT_PROVIDED: i32 = -1;

/// Read `key` as an integer
///
/// | Encoding | Result |
/// |---|---|
/// | absent / null | [`NOT_PROVIDED`], or `MissingField` if `required` |
/// | `Long` | narrowed to `i32` (two's-complement truncation) |
/// | `Int` | unchanged |
/// | `Double` | truncated toward zero (saturating) |
/// | `Str` | parsed as base-10 `i64`, then narrowed; `TypeCoercion` if unparsable |
/// | other | [`NOT_PROVIDED`], or `TypeCoercion` if `required` |
pub fn extract_int(record: &Record, key: &str, required: bool) -> Result<i32> {
    let value = match record.get(key) {
        None | Some(FieldValue::Null) => {
            if required {
                return Err(Error::MissingField(key.to_string()));
            }
            return Ok(NOT_PROVIDED);
        }
        Some(value) => value,
    };

    match value {
        FieldValue::Long(v) => Ok(*v as i32),
        FieldValue::Int(v) => Ok(*v),
        FieldValue::Double(v) => Ok(v.trunc() as i32),
        FieldValue::Str(s) => s
            .parse::<i64>()
            .map(|v| v as i32)
            .map_err(|e| Error::coercion(key, "integer", format!("{:?}: {}", s, e))),
        other if required => Err(Error::coercion(
            key,
            "integer",
            format!("unsupported encoding '{}'", other.kind()),
        )),
        _ => Ok(NOT_PROVIDED),
    }
}

/// Read `key` as an optional integer, mapping the sentinel to `None`
pub fn extract_optional_int(record: &Record, key: &str) -> Result<Option<i32>> {
    let value = extract_int(record, key, false)?;
    Ok((value != NOT_PROVIDED).then_some(value))
}

/// Read a required, non-empty string field
///
/// Absent, null and empty values are `MissingField`; a present value of
/// another encoding is `TypeCoercion`.
pub fn required_str(record: &Record, key: &str) -> Result<String> {
    match record.get(key) {
        None | Some(FieldValue::Null) => Err(Error::MissingField(key.to_string())),
        Some(FieldValue::Str(s)) if s.is_empty() => Err(Error::MissingField(key.to_string())),
        Some(FieldValue::Str(s)) => Ok(s.clone()),
        Some(other) => Err(Error::coercion(
            key,
            "string",
            format!("got '{}'", other.kind()),
        )),
    }
}

/// Read an optional string field; non-string encodings read as absent
pub fn optional_str<'a>(record: &'a Record, key: &str) -> Option<&'a str> {
    record.get(key).and_then(FieldValue::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with(value: FieldValue) -> Record {
        Record::new().with("n", value)
    }

    #[test]
    fn test_all_encodings_agree() {
        let encodings = [
            FieldValue::Int(262),
            FieldValue::Long(262),
            FieldValue::Double(262.0),
            FieldValue::Str("262".into()),
        ];
        for value in encodings {
            let kind = value.kind();
            assert_eq!(
                extract_int(&record_with(value), "n", true).unwrap(),
                262,
                "encoding {}",
                kind
            );
        }
    }

    #[test]
    fn test_double_truncates_toward_zero() {
        assert_eq!(extract_int(&record_with(FieldValue::Double(3.99)), "n", true).unwrap(), 3);
        assert_eq!(extract_int(&record_with(FieldValue::Double(-3.99)), "n", true).unwrap(), -3);
        assert_eq!(
            extract_int(&record_with(FieldValue::Double(f64::NAN)), "n", true).unwrap(),
            0
        );
        assert_eq!(
            extract_int(&record_with(FieldValue::Double(1e12)), "n", true).unwrap(),
            i32::MAX
        );
    }

    #[test]
    fn test_long_and_long_strings_narrow() {
        let wide = (1i64 << 32) + 7;
        assert_eq!(extract_int(&record_with(FieldValue::Long(wide)), "n", true).unwrap(), 7);
        assert_eq!(
            extract_int(&record_with(FieldValue::Str(wide.to_string())), "n", true).unwrap(),
            7
        );
    }

    #[test]
    fn test_signed_strings_parse() {
        assert_eq!(extract_int(&record_with("-5".into()), "n", true).unwrap(), -5);
        assert_eq!(extract_int(&record_with("+5".into()), "n", true).unwrap(), 5);
    }

    #[test]
    fn test_absent_optional_returns_sentinel() {
        let record = Record::new();
        assert_eq!(extract_int(&record, "n", false).unwrap(), NOT_PROVIDED);
        assert_eq!(extract_optional_int(&record, "n").unwrap(), None);
    }

    #[test]
    fn test_null_counts_as_absent() {
        let record = record_with(FieldValue::Null);
        assert_eq!(extract_int(&record, "n", false).unwrap(), NOT_PROVIDED);
        assert!(matches!(
            extract_int(&record, "n", true),
            Err(Error::MissingField(ref f)) if f == "n"
        ));
    }

    #[test]
    fn test_absent_required_is_missing_field() {
        assert!(matches!(
            extract_int(&Record::new(), "duration", true),
            Err(Error::MissingField(ref f)) if f == "duration"
        ));
    }

    #[test]
    fn test_unparsable_string_fails_even_when_optional() {
        for required in [true, false] {
            let result = extract_int(&record_with("twelve".into()), "n", required);
            assert!(matches!(result, Err(Error::TypeCoercion { .. })));
        }
        assert!(matches!(
            extract_int(&record_with(" 12".into()), "n", true),
            Err(Error::TypeCoercion { .. })
        ));
    }

    #[test]
    fn test_unsupported_encoding_follows_required_rule() {
        let record = record_with(FieldValue::Bool(true));
        assert_eq!(extract_int(&record, "n", false).unwrap(), NOT_PROVIDED);
        assert!(matches!(
            extract_int(&record, "n", true),
            Err(Error::TypeCoercion { .. })
        ));
    }

    #[test]
    fn test_required_str() {
        let record = Record::new()
            .with("artist", "Radiohead")
            .with("empty", "")
            .with("number", 5);

        assert_eq!(required_str(&record, "artist").unwrap(), "Radiohead");
        assert!(matches!(required_str(&record, "empty"), Err(Error::MissingField(_))));
        assert!(matches!(required_str(&record, "absent"), Err(Error::MissingField(_))));
        assert!(matches!(
            required_str(&record, "number"),
            Err(Error::TypeCoercion { .. })
        ));
    }

    #[test]
    fn test_optional_str_ignores_non_strings() {
        let record = Record::new().with("mbid", "abc").with("source", 7);
        assert_eq!(optional_str(&record, "mbid"), Some("abc"));
        assert_eq!(optional_str(&record, "source"), None);
        assert_eq!(optional_str(&record, "absent"), None);
    }
}
