//! Date and time conversion
//!
//! Formats use chrono strftime syntax. Custom formats from rule metadata are
//! tried first, then RFC 3339 (normalized to UTC), then the default list.
//! First match wins.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Utc};

use super::{DATE_FORMAT_KEY, DATE_FORMATS_KEY, TypeConverter};
use crate::filters::Metadata;
use crate::value::{Value, ValueKind};

/// Default formats: ISO-8601, US, European, then compact numeric forms
pub const DEFAULT_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
    "%d.%m.%Y",
    "%d-%m-%Y",
    "%Y%m%d%H%M%S",
    "%Y%m%d",
];

/// Converts text to `DateTime`; date-only inputs become midnight
#[derive(Debug, Clone, Default)]
pub struct DateTimeConverter {
    extra_formats: Vec<String>,
}

impl DateTimeConverter {
    /// Converter that also tries `formats` after any metadata formats
    pub fn with_formats(formats: Vec<String>) -> Self {
        Self {
            extra_formats: formats,
        }
    }
}

impl TypeConverter for DateTimeConverter {
    fn target(&self) -> ValueKind {
        ValueKind::DateTime
    }

    fn convert(&self, value: &Value, metadata: &Metadata) -> Result<Value, String> {
        match value {
            Value::DateTime(dt) => Ok(Value::DateTime(*dt)),
            Value::Date(d) => Ok(Value::DateTime(d.and_time(NaiveTime::MIN))),
            Value::Text(s) => {
                let mut formats = metadata_formats(metadata).map_err(|e| e.to_string())?;
                formats.extend(self.extra_formats.iter().cloned());
                parse_datetime(s, &formats)
                    .map(Value::DateTime)
                    .ok_or_else(|| format!("'{}' does not match any date format", s))
            }
            other => Err(format!("unsupported source type {}", other.type_name())),
        }
    }
}

/// Malformed date format metadata: the offending key and what it must hold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatMetadataError {
    pub key: &'static str,
    pub expected: &'static str,
}

impl FormatMetadataError {
    fn new(key: &'static str, expected: &'static str) -> Self {
        Self { key, expected }
    }

    /// Reason text without the key, e.g. "must be a string"
    pub fn reason(&self) -> String {
        format!("must be {}", self.expected)
    }
}

impl std::fmt::Display for FormatMetadataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "metadata '{}' {}", self.key, self.reason())
    }
}

/// Custom formats declared on the rule (`date_format`, then `date_formats`)
pub fn metadata_formats(metadata: &Metadata) -> Result<Vec<String>, FormatMetadataError> {
    let mut formats = Vec::new();

    match metadata.get(DATE_FORMAT_KEY) {
        None | Some(Value::Null) => {}
        Some(Value::Text(format)) => formats.push(format.clone()),
        Some(_) => return Err(FormatMetadataError::new(DATE_FORMAT_KEY, "a string")),
    }

    let list_error = || FormatMetadataError::new(DATE_FORMATS_KEY, "a list of strings");
    match metadata.get(DATE_FORMATS_KEY) {
        None | Some(Value::Null) => {}
        Some(Value::List(list)) => {
            for item in list.iter() {
                formats.push(item.as_str().ok_or_else(list_error)?.to_string());
            }
        }
        Some(_) => return Err(list_error()),
    }

    Ok(formats)
}

fn parse_with(text: &str, format: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, format)
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(text, format)
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

/// Parse a date or date-time string, custom formats first
pub fn parse_datetime(text: &str, custom_formats: &[String]) -> Option<NaiveDateTime> {
    let text = text.trim();
    custom_formats
        .iter()
        .find_map(|format| parse_with(text, format))
        .or_else(|| {
            DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|dt| dt.with_timezone(&Utc).naive_utc())
        })
        .or_else(|| {
            DEFAULT_DATE_FORMATS
                .iter()
                .find_map(|format| parse_with(text, format))
        })
}

/// Move a date or date-time to the last microsecond of its day
///
/// Other values are returned unchanged.
pub fn end_of_day(value: Value) -> Value {
    match value {
        Value::DateTime(dt) => Value::DateTime(last_instant(dt.date())),
        Value::Date(d) => Value::DateTime(last_instant(d)),
        other => other,
    }
}

fn last_instant(date: NaiveDate) -> NaiveDateTime {
    let midnight = date.and_time(NaiveTime::MIN);
    midnight
        .checked_add_signed(TimeDelta::days(1) - TimeDelta::microseconds(1))
        .unwrap_or(midnight)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_iso_date_only() {
        let dt = parse_datetime("2024-01-15", &[]).unwrap();
        assert_eq!(dt, ymd(2024, 1, 15).and_hms_opt(0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_iso_datetime() {
        let dt = parse_datetime("2024-01-15T10:30:00", &[]).unwrap();
        assert_eq!(dt.hour(), 10);
        assert_eq!(dt.minute(), 30);
    }

    #[test]
    fn test_parse_rfc3339_normalizes_to_utc() {
        let dt = parse_datetime("2024-01-15T10:30:00+05:00", &[]).unwrap();
        assert_eq!(dt.hour(), 5);
        assert_eq!(dt.minute(), 30);
    }

    #[test]
    fn test_parse_us_before_european() {
        // Ambiguous input resolves to the US reading
        let dt = parse_datetime("02/03/2024", &[]).unwrap();
        assert_eq!(dt.month(), 2);
        assert_eq!(dt.day(), 3);
        // Unambiguous European input falls through to the European reading
        let dt = parse_datetime("31/01/2024", &[]).unwrap();
        assert_eq!(dt.date(), ymd(2024, 1, 31));
    }

    #[test]
    fn test_parse_dotted_european() {
        let dt = parse_datetime("31.12.2023 23:15:00", &[]).unwrap();
        assert_eq!(dt.date(), ymd(2023, 12, 31));
        assert_eq!(dt.hour(), 23);
    }

    #[test]
    fn test_parse_compact() {
        let dt = parse_datetime("20240131", &[]).unwrap();
        assert_eq!(dt.date(), ymd(2024, 1, 31));
    }

    #[test]
    fn test_custom_format_takes_priority() {
        let custom = vec!["%d/%m/%Y".to_string()];
        let dt = parse_datetime("02/03/2024", &custom).unwrap();
        assert_eq!(dt.month(), 3);
        assert_eq!(dt.day(), 2);
    }

    #[test]
    fn test_parse_failure() {
        assert!(parse_datetime("next tuesday", &[]).is_none());
    }

    #[test]
    fn test_converter_reads_metadata_formats() {
        let mut metadata = Metadata::new();
        metadata.insert(
            DATE_FORMATS_KEY.to_string(),
            Value::list(["%d %b %Y"]),
        );
        let out = DateTimeConverter::default()
            .convert(&Value::from("05 Mar 2024"), &metadata)
            .unwrap();
        assert_eq!(out, Value::DateTime(ymd(2024, 3, 5).and_hms_opt(0, 0, 0).unwrap()));
    }

    #[test]
    fn test_converter_rejects_bad_metadata() {
        let mut metadata = Metadata::new();
        metadata.insert(DATE_FORMAT_KEY.to_string(), Value::Int(3));
        let err = DateTimeConverter::default()
            .convert(&Value::from("2024-01-01"), &metadata)
            .unwrap_err();
        assert_eq!(err, "metadata 'date_format' must be a string");
    }

    #[test]
    fn test_metadata_formats_shapes() {
        let mut metadata = Metadata::new();
        metadata.insert(DATE_FORMAT_KEY.to_string(), Value::from("%d|%m|%Y"));
        metadata.insert(DATE_FORMATS_KEY.to_string(), Value::list(["%Y~%m~%d"]));
        assert_eq!(
            metadata_formats(&metadata).unwrap(),
            vec!["%d|%m|%Y".to_string(), "%Y~%m~%d".to_string()]
        );

        metadata.insert(DATE_FORMATS_KEY.to_string(), Value::list([Value::Int(1)]));
        let err = metadata_formats(&metadata).unwrap_err();
        assert_eq!(err.key, DATE_FORMATS_KEY);
        assert_eq!(err.reason(), "must be a list of strings");
    }

    #[test]
    fn test_converter_extra_formats() {
        let converter = DateTimeConverter::with_formats(vec!["%Y.%j".to_string()]);
        let out = converter
            .convert(&Value::from("2024.032"), &Metadata::new())
            .unwrap();
        assert_eq!(out, Value::DateTime(ymd(2024, 2, 1).and_hms_opt(0, 0, 0).unwrap()));
    }

    #[test]
    fn test_converter_rejects_numbers() {
        assert!(
            DateTimeConverter::default()
                .convert(&Value::Int(20240101), &Metadata::new())
                .is_err()
        );
    }

    #[test]
    fn test_end_of_day() {
        let start = Value::DateTime(ymd(2024, 1, 31).and_hms_opt(0, 0, 0).unwrap());
        let expected = ymd(2024, 1, 31).and_hms_micro_opt(23, 59, 59, 999_999).unwrap();
        assert_eq!(end_of_day(start), Value::DateTime(expected));
        assert_eq!(end_of_day(Value::Date(ymd(2024, 1, 31))), Value::DateTime(expected));
        assert_eq!(end_of_day(Value::Int(4)), Value::Int(4));
    }
}
