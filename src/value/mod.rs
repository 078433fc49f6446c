//! # Value Type System
//!
//! Scalar values held by synthetic rows. Each variant corresponds to one
//! [`ColumnType`] of the schema registry.
//!
//! ## Wire form
//!
//! Values serialize as plain JSON scalars so API responses read like rows
//! coming out of a real database:
//!
//! ```text
//! Integer(7)        -> 7
//! Decimal(19.99)    -> 19.99
//! Text("North")     -> "North"
//! Date(2025-03-01)  -> "2025-03-01"
//! Boolean(true)     -> true
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Serialize, Serializer};

use crate::schema::ColumnType;

/// A single cell of a synthetic row.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Decimal(f64),
    /// Shared text, cheap to clone when rows are copied into responses
    Text(Arc<str>),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Boolean(bool),
}

impl Value {
    /// Create a text value
    pub fn text(s: impl AsRef<str>) -> Self {
        Value::Text(Arc::from(s.as_ref()))
    }

    /// Create a decimal value rounded to cents
    pub fn money(v: f64) -> Self {
        Value::Decimal(round_cents(v))
    }

    /// Column type this value satisfies
    pub fn column_type(&self) -> ColumnType {
        match self {
            Value::Integer(_) => ColumnType::Integer,
            Value::Decimal(_) => ColumnType::Decimal,
            Value::Text(_) => ColumnType::Text,
            Value::Date(_) => ColumnType::Date,
            Value::DateTime(_) => ColumnType::DateTime,
            Value::Boolean(_) => ColumnType::Boolean,
        }
    }

    /// Numeric view for aggregation. `None` for non-numeric values.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(v) => Some(*v as f64),
            Value::Decimal(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Calendar date of a date or datetime value
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            Value::DateTime(dt) => Some(dt.date()),
            _ => None,
        }
    }

    /// Ordering between values of compatible types.
    ///
    /// Integers and decimals compare numerically, dates and datetimes compare
    /// on the calendar date, text compares case-insensitively. Anything else
    /// is incomparable.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Text(a), Value::Text(b)) => {
                Some(a.to_lowercase().cmp(&b.to_lowercase()))
            }
            (Value::Boolean(a), Value::Boolean(b)) => Some(a.cmp(b)),
            (Value::DateTime(a), Value::DateTime(b)) => Some(a.cmp(b)),
            (a, b) if a.as_date().is_some() && b.as_date().is_some() => {
                Some(a.as_date()?.cmp(&b.as_date()?))
            }
            (a, b) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        }
    }
}

/// Round to two decimal places
pub fn round_cents(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{v}"),
            Value::Decimal(v) => write!(f, "{v:.2}"),
            Value::Text(s) => write!(f, "{s}"),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S")),
            Value::Boolean(b) => write!(f, "{b}"),
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Integer(v) => serializer.serialize_i64(*v),
            Value::Decimal(v) => serializer.serialize_f64(*v),
            Value::Text(s) => serializer.serialize_str(s),
            Value::Boolean(b) => serializer.serialize_bool(*b),
            Value::Date(_) | Value::DateTime(_) => serializer.collect_str(self),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Decimal(v)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::text(s)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}
