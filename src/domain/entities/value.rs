//! Tagged cell values.
//!
//! Every cell of a [`Page`](super::Page) is a [`CellValue`]. Sorting and
//! filtering switch on the tag instead of guessing at the runtime shape of a
//! value, so a numeric column that arrives as text is coerced once with
//! [`CellValue::conform`] and then compared as a number.

use std::borrow::Cow;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::column::ColumnType;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

const TIMESTAMP_INPUT_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Shared null used when a row has no entry for a column.
pub static NULL_CELL: CellValue = CellValue::Null;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Double(f64),
    Text(String),
    Date(NaiveDate),
    Timestamp(NaiveDateTime),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Integer(v) => Some(*v as f64),
            CellValue::Double(v) => Some(*v),
            _ => None,
        }
    }

    /// The instant a date-like value denotes. A bare date is midnight UTC.
    pub fn as_instant(&self) -> Option<NaiveDateTime> {
        match self {
            CellValue::Date(v) => Some(v.and_time(NaiveTime::MIN)),
            CellValue::Timestamp(v) => Some(*v),
            _ => None,
        }
    }

    /// The text the table renders for this value.
    ///
    /// Filtering, collation and CSV export all go through this so that a
    /// user searching for what they see on screen always finds it.
    pub fn display(&self) -> Cow<'_, str> {
        match self {
            CellValue::Null => Cow::Borrowed("null"),
            CellValue::Bool(v) => Cow::Borrowed(if *v { "true" } else { "false" }),
            CellValue::Integer(v) => Cow::Owned(v.to_string()),
            CellValue::Double(v) => Cow::Owned(v.to_string()),
            CellValue::Text(v) => Cow::Borrowed(v.as_str()),
            CellValue::Date(v) => Cow::Owned(v.format(DATE_FORMAT).to_string()),
            CellValue::Timestamp(v) => Cow::Owned(v.format(TIMESTAMP_FORMAT).to_string()),
        }
    }

    /// Decodes stored text according to a column's declared type.
    ///
    /// Text that does not fit the type stays `Text`.
    pub fn parse_as(text: &str, column_type: ColumnType) -> CellValue {
        let trimmed = text.trim();
        let parsed = match column_type {
            ColumnType::String => None,
            ColumnType::Integer => trimmed
                .parse::<i64>()
                .map(CellValue::Integer)
                .ok()
                .or_else(|| parse_double(trimmed)),
            ColumnType::Double => parse_double(trimmed),
            ColumnType::Boolean => parse_bool(trimmed).map(CellValue::Bool),
            ColumnType::Date => parse_date(trimmed)
                .map(CellValue::Date)
                .or_else(|| parse_timestamp(trimmed).map(CellValue::Timestamp)),
            ColumnType::Timestamp => parse_timestamp(trimmed)
                .map(CellValue::Timestamp)
                .or_else(|| parse_date(trimmed).map(CellValue::Date)),
        };
        parsed.unwrap_or_else(|| CellValue::Text(text.to_string()))
    }

    /// Coerces this value to `column_type`, borrowing when nothing changes.
    ///
    /// Integers in temporal columns are read the way columnar sources encode
    /// them: epoch milliseconds for timestamps, epoch days for dates.
    pub fn conform(&self, column_type: ColumnType) -> Cow<'_, CellValue> {
        let converted = match (self, column_type) {
            (CellValue::Text(text), ty) if ty != ColumnType::String => {
                match CellValue::parse_as(text, ty) {
                    CellValue::Text(_) => None,
                    other => Some(other),
                }
            }
            (CellValue::Integer(millis), ColumnType::Timestamp) => {
                DateTime::from_timestamp_millis(*millis)
                    .map(|instant| CellValue::Timestamp(instant.naive_utc()))
            }
            (CellValue::Integer(days), ColumnType::Date) => i32::try_from(*days)
                .ok()
                .and_then(|days| days.checked_add(EPOCH_DAYS_FROM_CE))
                .and_then(NaiveDate::from_num_days_from_ce_opt)
                .map(CellValue::Date),
            (CellValue::Integer(v), ColumnType::Boolean) if *v == 0 || *v == 1 => {
                Some(CellValue::Bool(*v == 1))
            }
            _ => None,
        };

        match converted {
            Some(value) => Cow::Owned(value),
            None => Cow::Borrowed(self),
        }
    }
}

// 1970-01-01 counted from 0001-01-01.
const EPOCH_DAYS_FROM_CE: i32 = 719_163;

fn parse_double(text: &str) -> Option<CellValue> {
    if text.is_empty() {
        return None;
    }
    text.parse::<f64>().ok().map(CellValue::Double)
}

fn parse_bool(text: &str) -> Option<bool> {
    if text.eq_ignore_ascii_case("true") {
        Some(true)
    } else if text.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

pub(crate) fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, DATE_FORMAT).ok()
}

pub(crate) fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
        return Some(instant.naive_utc());
    }
    TIMESTAMP_INPUT_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Null => serializer.serialize_none(),
            CellValue::Bool(v) => serializer.serialize_bool(*v),
            CellValue::Integer(v) => serializer.serialize_i64(*v),
            CellValue::Double(v) => serializer.serialize_f64(*v),
            CellValue::Text(v) => serializer.serialize_str(v),
            CellValue::Date(v) => serializer.collect_str(&v.format(DATE_FORMAT)),
            CellValue::Timestamp(v) => {
                serializer.collect_str(&v.format("%Y-%m-%dT%H:%M:%S%.f"))
            }
        }
    }
}

struct CellValueVisitor;

impl<'de> Visitor<'de> for CellValueVisitor {
    type Value = CellValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string, number, boolean or null")
    }

    fn visit_unit<E: de::Error>(self) -> Result<CellValue, E> {
        Ok(CellValue::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<CellValue, E> {
        Ok(CellValue::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<CellValue, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<CellValue, E> {
        Ok(CellValue::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<CellValue, E> {
        Ok(CellValue::Integer(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<CellValue, E> {
        Ok(i64::try_from(v)
            .map(CellValue::Integer)
            .unwrap_or(CellValue::Double(v as f64)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<CellValue, E> {
        Ok(CellValue::Double(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<CellValue, E> {
        Ok(CellValue::Text(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<CellValue, E> {
        Ok(CellValue::Text(v))
    }
}

impl<'de> Deserialize<'de> for CellValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(CellValueVisitor)
    }
}

impl From<bool> for CellValue {
    fn from(v: bool) -> Self {
        CellValue::Bool(v)
    }
}

impl From<i32> for CellValue {
    fn from(v: i32) -> Self {
        CellValue::Integer(i64::from(v))
    }
}

impl From<i64> for CellValue {
    fn from(v: i64) -> Self {
        CellValue::Integer(v)
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Double(v)
    }
}

impl From<&str> for CellValue {
    fn from(v: &str) -> Self {
        CellValue::Text(v.to_string())
    }
}

impl From<String> for CellValue {
    fn from(v: String) -> Self {
        CellValue::Text(v)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(v: NaiveDate) -> Self {
        CellValue::Date(v)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(v: NaiveDateTime) -> Self {
        CellValue::Timestamp(v)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => CellValue::Null,
        }
    }
}
