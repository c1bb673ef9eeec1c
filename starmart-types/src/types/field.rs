use crate::constants::{DATE_FORMAT, TIMESTAMP_FORMAT};
use chrono::{NaiveDate, NaiveDateTime};
use ordered_float::OrderedFloat;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    UInt(u64),
    Int(i64),
    Float(OrderedFloat<f64>),
    Boolean(bool),
    String(String),
    Decimal(Decimal),
    Timestamp(NaiveDateTime),
    Date(NaiveDate),
    Null,
}

impl Field {
    pub fn get_type(&self) -> Option<FieldType> {
        match self {
            Field::UInt(_) => Some(FieldType::UInt),
            Field::Int(_) => Some(FieldType::Int),
            Field::Float(_) => Some(FieldType::Float),
            Field::Boolean(_) => Some(FieldType::Boolean),
            Field::String(_) => Some(FieldType::String),
            Field::Decimal(_) => Some(FieldType::Decimal),
            Field::Timestamp(_) => Some(FieldType::Timestamp),
            Field::Date(_) => Some(FieldType::Date),
            Field::Null => None,
        }
    }

    pub fn as_uint(&self) -> Option<u64> {
        match self {
            Field::UInt(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&str> {
        match self {
            Field::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Field::Decimal(d) => Some(*d),
            _ => None,
        }
    }
}

impl From<u64> for Field {
    fn from(value: u64) -> Self {
        Field::UInt(value)
    }
}

impl From<i64> for Field {
    fn from(value: i64) -> Self {
        Field::Int(value)
    }
}

impl From<f64> for Field {
    fn from(value: f64) -> Self {
        Field::Float(OrderedFloat(value))
    }
}

impl From<bool> for Field {
    fn from(value: bool) -> Self {
        Field::Boolean(value)
    }
}

impl From<String> for Field {
    fn from(value: String) -> Self {
        Field::String(value)
    }
}

impl From<&str> for Field {
    fn from(value: &str) -> Self {
        Field::String(value.to_owned())
    }
}

impl From<Decimal> for Field {
    fn from(value: Decimal) -> Self {
        Field::Decimal(value)
    }
}

impl From<NaiveDateTime> for Field {
    fn from(value: NaiveDateTime) -> Self {
        Field::Timestamp(value)
    }
}

impl From<NaiveDate> for Field {
    fn from(value: NaiveDate) -> Self {
        Field::Date(value)
    }
}

impl<T: Into<Field>> From<Option<T>> for Field {
    fn from(value: Option<T>) -> Self {
        value.map_or(Field::Null, Into::into)
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Field::UInt(v) => write!(f, "{v}"),
            Field::Int(v) => write!(f, "{v}"),
            Field::Float(v) => write!(f, "{v}"),
            Field::Boolean(v) => write!(f, "{v}"),
            Field::String(v) => f.write_str(v),
            Field::Decimal(v) => write!(f, "{v}"),
            Field::Timestamp(v) => write!(f, "{}", v.format(TIMESTAMP_FORMAT)),
            Field::Date(v) => write!(f, "{}", v.format(DATE_FORMAT)),
            Field::Null => f.write_str("NULL"),
        }
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum FieldType {
    UInt,
    Int,
    Float,
    Boolean,
    String,
    Decimal,
    Timestamp,
    Date,
}

impl Display for FieldType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FieldType::UInt => "UInt",
            FieldType::Int => "Int",
            FieldType::Float => "Float",
            FieldType::Boolean => "Boolean",
            FieldType::String => "String",
            FieldType::Decimal => "Decimal",
            FieldType::Timestamp => "Timestamp",
            FieldType::Date => "Date",
        };
        f.write_str(name)
    }
}
