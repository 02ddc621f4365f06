//! Core data structures for typed rows.
//!
//! Defines the closed set of cell value types, the field keys rows are
//! indexed by, and the ordered [`Row`] mapping handed to callers.

use chrono::{FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use std::fmt;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S%.f";
const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Typed value of a single cell
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Integer(i64),
    Float(f64),
    /// Unescaped text
    String(String),
    Date(NaiveDate),
    /// Date and time of day, with the UTC offset when the source carried one
    DateTime {
        datetime: NaiveDateTime,
        offset: Option<FixedOffset>,
    },
    Time(NaiveTime),
}

/// Discriminant of a [`CellValue`], used for reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    Null,
    Integer,
    Float,
    String,
    Date,
    DateTime,
    Time,
}

impl CellKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CellKind::Null => "null",
            CellKind::Integer => "integer",
            CellKind::Float => "float",
            CellKind::String => "string",
            CellKind::Date => "date",
            CellKind::DateTime => "datetime",
            CellKind::Time => "time",
        }
    }
}

impl fmt::Display for CellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl CellValue {
    /// Build a naive (offset-less) datetime value
    pub fn naive_datetime(datetime: NaiveDateTime) -> Self {
        CellValue::DateTime {
            datetime,
            offset: None,
        }
    }

    pub fn kind(&self) -> CellKind {
        match self {
            CellValue::Null => CellKind::Null,
            CellValue::Integer(_) => CellKind::Integer,
            CellValue::Float(_) => CellKind::Float,
            CellValue::String(_) => CellKind::String,
            CellValue::Date(_) => CellKind::Date,
            CellValue::DateTime { .. } => CellKind::DateTime,
            CellValue::Time(_) => CellKind::Time,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CellValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// Numeric value as f64; integers widen
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Integer(value) => Some(*value as f64),
            CellValue::Float(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::String(value) => Some(value),
            _ => None,
        }
    }

    /// Render the value as a delimited-text field
    ///
    /// Strings are always quoted, with embedded quote characters doubled.
    /// Floats keep a fractional part so they are not re-read as integers.
    /// Other kinds are written bare, so the field reads back to the same value
    /// only when the separator does not occur in the rendered text.
    pub fn to_field(&self, quote_char: char) -> String {
        match self {
            CellValue::Null => String::new(),
            CellValue::Integer(value) => value.to_string(),
            CellValue::Float(value) => format!("{:?}", value),
            CellValue::String(value) => {
                let doubled: String = [quote_char, quote_char].iter().collect();
                let escaped = value.replace(quote_char, &doubled);
                format!("{quote_char}{escaped}{quote_char}")
            }
            CellValue::Date(date) => date.format(DATE_FORMAT).to_string(),
            CellValue::DateTime { datetime, offset } => {
                let mut text = datetime.format(DATETIME_FORMAT).to_string();
                if let Some(offset) = offset {
                    text.push_str(&offset.to_string());
                }
                text
            }
            CellValue::Time(time) => time.format(TIME_FORMAT).to_string(),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => f.write_str("null"),
            CellValue::String(value) => f.write_str(value),
            other => f.write_str(&other.to_field('"')),
        }
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Null => serializer.serialize_none(),
            CellValue::Integer(value) => serializer.serialize_i64(*value),
            CellValue::Float(value) => serializer.serialize_f64(*value),
            CellValue::String(value) => serializer.serialize_str(value),
            other => serializer.serialize_str(&other.to_field('"')),
        }
    }
}

/// Identifier of a column: a declared name or a positional index
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldKey {
    Name(String),
    Index(usize),
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKey::Name(name) => f.write_str(name),
            FieldKey::Index(index) => write!(f, "{}", index),
        }
    }
}

impl From<&str> for FieldKey {
    fn from(name: &str) -> Self {
        FieldKey::Name(name.to_string())
    }
}

impl From<String> for FieldKey {
    fn from(name: String) -> Self {
        FieldKey::Name(name)
    }
}

impl From<usize> for FieldKey {
    fn from(index: usize) -> Self {
        FieldKey::Index(index)
    }
}

impl Serialize for FieldKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldKey::Name(name) => serializer.serialize_str(name),
            FieldKey::Index(index) => serializer.serialize_u64(*index as u64),
        }
    }
}

/// One record: field keys in column order, each mapped to its value
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Row {
    cells: IndexMap<FieldKey, CellValue>,
}

impl Row {
    /// Look up a value by name or positional index
    pub fn get(&self, key: impl Into<FieldKey>) -> Option<&CellValue> {
        self.cells.get(&key.into())
    }

    /// Value in the given column position, whatever its key
    pub fn value_at(&self, position: usize) -> Option<&CellValue> {
        self.cells.get_index(position).map(|(_, value)| value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &FieldKey> {
        self.cells.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &CellValue> {
        self.cells.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldKey, &CellValue)> {
        self.cells.iter()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn into_inner(self) -> IndexMap<FieldKey, CellValue> {
        self.cells
    }
}

impl<K: Into<FieldKey>> FromIterator<(K, CellValue)> for Row {
    fn from_iter<T: IntoIterator<Item = (K, CellValue)>>(iter: T) -> Self {
        Self {
            cells: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl IntoIterator for Row {
    type Item = (FieldKey, CellValue);
    type IntoIter = indexmap::map::IntoIter<FieldKey, CellValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_field_quotes_strings() {
        let value = CellValue::String("a \"String\"".to_string());
        assert_eq!(value.to_field('"'), "\"a \"\"String\"\"\"");
        assert_eq!(
            CellValue::String("it's".to_string()).to_field('\''),
            "'it''s'"
        );
    }

    #[test]
    fn test_to_field_keeps_float_fraction() {
        assert_eq!(CellValue::Float(2.0).to_field('"'), "2.0");
        assert_eq!(CellValue::Float(2.5).to_field('"'), "2.5");
        assert_eq!(CellValue::Integer(-7).to_field('"'), "-7");
        assert_eq!(CellValue::Null.to_field('"'), "");
    }

    #[test]
    fn test_to_field_dates() {
        let date = NaiveDate::from_ymd_opt(2021, 2, 5).unwrap();
        let time = NaiveTime::from_hms_micro_opt(23, 50, 12, 250).unwrap();
        assert_eq!(CellValue::Date(date).to_field('"'), "2021-02-05");
        assert_eq!(CellValue::Time(time).to_field('"'), "23:50:12.000250");

        let datetime = CellValue::DateTime {
            datetime: date.and_hms_opt(23, 50, 12).unwrap(),
            offset: FixedOffset::east_opt(3600),
        };
        assert_eq!(datetime.to_field('"'), "2021-02-05T23:50:12+01:00");
    }

    #[test]
    fn test_row_lookup() {
        let row: Row = vec![("a", CellValue::Integer(1)), ("b", CellValue::Null)]
            .into_iter()
            .collect();

        assert_eq!(row.len(), 2);
        assert_eq!(row.get("a"), Some(&CellValue::Integer(1)));
        assert_eq!(row.get("missing"), None);
        assert_eq!(row.value_at(1), Some(&CellValue::Null));
        assert_eq!(
            row.keys().cloned().collect::<Vec<_>>(),
            vec![FieldKey::from("a"), FieldKey::from("b")]
        );

        let cells = row.into_inner();
        assert_eq!(cells.get_index(0), Some((&FieldKey::from("a"), &CellValue::Integer(1))));
    }

    #[test]
    fn test_numeric_accessors() {
        assert_eq!(CellValue::Integer(7).as_i64(), Some(7));
        assert_eq!(CellValue::Integer(7).as_f64(), Some(7.0));
        assert_eq!(CellValue::Float(2.5).as_f64(), Some(2.5));
        assert_eq!(CellValue::Float(2.5).as_i64(), None);
        assert_eq!(CellValue::String("7".into()).as_i64(), None);
        assert_eq!(CellValue::String("7".into()).as_str(), Some("7"));
    }

    #[test]
    fn test_row_serializes_in_key_order() {
        let row: Row = vec![
            (2usize, CellValue::Float(2.5)),
            (0usize, CellValue::Null),
            (1usize, CellValue::String("x".to_string())),
        ]
        .into_iter()
        .collect();

        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"{"2":2.5,"0":null,"1":"x"}"#);
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(CellValue::Null.kind().to_string(), "null");
        assert_eq!(CellValue::Integer(1).kind(), CellKind::Integer);
        assert_eq!(CellKind::DateTime.as_str(), "datetime");
    }
}
