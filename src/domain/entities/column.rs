use std::fmt;

use serde::{Deserialize, Serialize};

use super::value::CellValue;

/// Semantic type tag of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum ColumnType {
    #[default]
    String,
    Integer,
    Double,
    Boolean,
    Timestamp,
    Date,
}

impl ColumnType {
    pub fn as_str(self) -> &'static str {
        match self {
            ColumnType::String => "string",
            ColumnType::Integer => "integer",
            ColumnType::Double => "double",
            ColumnType::Boolean => "boolean",
            ColumnType::Timestamp => "timestamp",
            ColumnType::Date => "date",
        }
    }

    /// Reads a type tag, including the physical type names columnar sources
    /// report (`INT64`, `BINARY`, ...). Unknown tags are treated as strings.
    pub fn from_tag(tag: &str) -> ColumnType {
        match tag.trim().to_ascii_lowercase().as_str() {
            "integer" | "int" | "int32" | "int64" | "long" | "bigint" => ColumnType::Integer,
            "double" | "float" | "decimal" | "number" => ColumnType::Double,
            "boolean" | "bool" => ColumnType::Boolean,
            "timestamp" | "datetime" | "int96" => ColumnType::Timestamp,
            "date" => ColumnType::Date,
            _ => ColumnType::String,
        }
    }
}

impl From<String> for ColumnType {
    fn from(tag: String) -> Self {
        ColumnType::from_tag(&tag)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Informational per-column statistics. Sorting and filtering never read these.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnStatistics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<CellValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<CellValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub null_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distinct_count: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(rename = "type", default)]
    pub column_type: ColumnType,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statistics: Option<ColumnStatistics>,
}

impl Column {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            nullable: false,
            statistics: None,
        }
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn with_statistics(mut self, statistics: ColumnStatistics) -> Self {
        self.statistics = Some(statistics);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_tags_round_trip_through_json() {
        let column: Column =
            serde_json::from_str(r#"{"name":"id","type":"INT64","nullable":true}"#)
                .expect("column json should parse");
        assert_eq!(column.column_type, ColumnType::Integer);
        assert!(column.nullable);

        let json = serde_json::to_string(&column).expect("column should serialize");
        assert_eq!(json, r#"{"name":"id","type":"integer","nullable":true}"#);
    }

    #[test]
    fn unknown_type_tags_are_strings() {
        assert_eq!(ColumnType::from_tag("BINARY"), ColumnType::String);
        assert_eq!(ColumnType::from_tag("fixed_len_byte_array"), ColumnType::String);
    }
}
