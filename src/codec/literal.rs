// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Text grammar for each variable kind.

use std::str::FromStr;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use super::{TypedValue, VariableKind};
use crate::errors::CodecError;

const NAIVE_DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";
// `%Y` takes the signed form render produces for years outside 0000..=9999.
const EXTENDED_DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%:z";

/// Parse `text` under the grammar of `kind`.
///
/// The null kind yields `None` whatever the text. File attachments carry their
/// own record structure and are rejected here; see [`super::decode_record`].
pub fn decode(kind: VariableKind, text: &str) -> Result<Option<TypedValue>, CodecError> {
    let trimmed = text.trim();
    let value = match kind {
        VariableKind::Null => return Ok(None),
        VariableKind::Boolean => {
            if trimmed.eq_ignore_ascii_case("true") {
                TypedValue::Boolean(true)
            } else if trimmed.eq_ignore_ascii_case("false") {
                TypedValue::Boolean(false)
            } else {
                return Err(malformed(kind, text, "expected 'true' or 'false'"));
            }
        }
        VariableKind::Byte => TypedValue::Bytes(
            STANDARD
                .decode(trimmed)
                .map_err(|e| malformed(kind, text, e))?,
        ),
        VariableKind::Char => TypedValue::Char(
            text.chars()
                .next()
                .ok_or_else(|| malformed(kind, text, "empty text"))?,
        ),
        VariableKind::DateTime => TypedValue::DateTime(
            parse_date_time(trimmed).map_err(|e| malformed(kind, text, e))?,
        ),
        VariableKind::Decimal => TypedValue::Decimal(parse(kind, text)?),
        VariableKind::Double => TypedValue::Double(parse(kind, text)?),
        VariableKind::Float => TypedValue::Float(parse(kind, text)?),
        VariableKind::Integer => TypedValue::Integer(parse(kind, text)?),
        VariableKind::Long => TypedValue::Long(parse(kind, text)?),
        VariableKind::Short => TypedValue::Short(parse(kind, text)?),
        VariableKind::String => TypedValue::String(text.to_string()),
        VariableKind::File => return Err(CodecError::StructuredKind(kind)),
    };
    Ok(Some(value))
}

/// Canonical text form of a value; `None` for file attachments.
pub fn render(value: &TypedValue) -> Option<String> {
    let text = match value {
        TypedValue::Boolean(true) => "True".to_string(),
        TypedValue::Boolean(false) => "False".to_string(),
        TypedValue::Bytes(bytes) => STANDARD.encode(bytes),
        TypedValue::Char(c) => c.to_string(),
        TypedValue::DateTime(dt) => dt.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        TypedValue::Decimal(d) => d.to_string(),
        TypedValue::Double(v) => v.to_string(),
        TypedValue::Float(v) => v.to_string(),
        TypedValue::Integer(v) => v.to_string(),
        TypedValue::Long(v) => v.to_string(),
        TypedValue::Short(v) => v.to_string(),
        TypedValue::String(s) => s.clone(),
        TypedValue::File(_) => return None,
    };
    Some(text)
}

fn parse<T>(kind: VariableKind, text: &str) -> Result<T, CodecError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    text.trim().parse::<T>().map_err(|e| malformed(kind, text, e))
}

fn parse_date_time(text: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    let rfc_err = match DateTime::parse_from_rfc3339(text) {
        Ok(dt) => return Ok(dt.with_timezone(&Utc)),
        Err(err) => err,
    };
    let with_offset = match text.strip_suffix('Z') {
        Some(head) => format!("{}+00:00", head),
        None => text.to_string(),
    };
    DateTime::parse_from_str(&with_offset, EXTENDED_DATE_TIME_FORMAT)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(text, NAIVE_DATE_TIME_FORMAT)
                .map(|naive| Utc.from_utc_datetime(&naive))
        })
        .map_err(|_| rfc_err)
}

fn malformed(kind: VariableKind, text: &str, reason: impl std::fmt::Display) -> CodecError {
    CodecError::MalformedLiteral {
        kind,
        text: text.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use rust_decimal::Decimal;

    fn round_trip(value: TypedValue) {
        let text = render(&value).unwrap();
        let back = decode(value.kind(), &text).unwrap();
        assert_eq!(back, Some(value), "round trip through '{}'", text);
    }

    #[test]
    fn test_round_trip_every_text_kind() {
        let when = Utc
            .with_ymd_and_hms(2024, 2, 29, 23, 59, 58)
            .unwrap()
            .with_nanosecond(123_456_000)
            .unwrap();

        let values = vec![
            TypedValue::Boolean(true),
            TypedValue::Boolean(false),
            TypedValue::Bytes(vec![0, 1, 2, 250, 255]),
            TypedValue::Bytes(vec![]),
            TypedValue::Char('é'),
            TypedValue::DateTime(when),
            TypedValue::Decimal(Decimal::from_str("-12345.6700").unwrap()),
            TypedValue::Double(0.1),
            TypedValue::Float(2.5),
            TypedValue::Integer(i32::MIN),
            TypedValue::Long(i64::MAX),
            TypedValue::Short(-32768),
            TypedValue::String("  spaced <markup> & ]]> text ".to_string()),
            TypedValue::String(String::new()),
        ];

        for value in values {
            round_trip(value);
        }
    }

    #[test]
    fn test_date_times_beyond_four_digit_years_round_trip() {
        let far_future = Utc.with_ymd_and_hms(12000, 1, 1, 0, 0, 0).unwrap();
        let before_year_zero = Utc.with_ymd_and_hms(-50, 6, 15, 8, 30, 0).unwrap();

        let text = render(&TypedValue::DateTime(far_future)).unwrap();
        assert!(text.starts_with("+12000-"), "rendered as '{}'", text);

        round_trip(TypedValue::DateTime(far_future));
        round_trip(TypedValue::DateTime(before_year_zero));
        round_trip(TypedValue::DateTime(
            far_future.with_nanosecond(5_000_000).unwrap(),
        ));
    }

    #[test]
    fn test_decimal_keeps_its_scale() {
        let text = render(&TypedValue::Decimal(Decimal::from_str("1.50").unwrap())).unwrap();
        assert_eq!(text, "1.50");
    }

    #[test]
    fn test_null_ignores_text() {
        assert_eq!(decode(VariableKind::Null, "anything").unwrap(), None);
        assert_eq!(decode(VariableKind::Null, "").unwrap(), None);
    }

    #[test]
    fn test_lenient_forms_accepted() {
        assert_eq!(
            decode(VariableKind::Boolean, " TRUE ").unwrap(),
            Some(TypedValue::Boolean(true))
        );
        assert_eq!(
            decode(VariableKind::Char, "abc").unwrap(),
            Some(TypedValue::Char('a'))
        );
        assert_eq!(
            decode(VariableKind::DateTime, "2024-01-02 03:04:05").unwrap(),
            Some(TypedValue::DateTime(
                Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()
            ))
        );
        assert_eq!(
            decode(VariableKind::DateTime, "2024-01-02T05:04:05+02:00").unwrap(),
            Some(TypedValue::DateTime(
                Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()
            ))
        );
    }

    #[test]
    fn test_malformed_literals_are_errors() {
        let cases = vec![
            (VariableKind::Boolean, "yes"),
            (VariableKind::Byte, "not base64!"),
            (VariableKind::Char, ""),
            (VariableKind::DateTime, "yesterday"),
            (VariableKind::Decimal, "1.2.3"),
            (VariableKind::Double, "one"),
            (VariableKind::Float, ""),
            (VariableKind::Integer, "2147483648"),
            (VariableKind::Long, "12L"),
            (VariableKind::Short, "40000"),
        ];

        for (kind, text) in cases {
            match decode(kind, text) {
                Err(CodecError::MalformedLiteral { kind: k, .. }) => assert_eq!(k, kind),
                other => panic!("{} '{}' should be malformed, got {:?}", kind, text, other),
            }
        }
    }

    #[test]
    fn test_file_kind_needs_its_record() {
        assert_eq!(
            decode(VariableKind::File, "abc").unwrap_err(),
            CodecError::StructuredKind(VariableKind::File)
        );
        let file = super::super::FileAttachment::new("a", "txt", "text/plain", vec![1]);
        assert_eq!(render(&TypedValue::File(file)), None);
    }
}
