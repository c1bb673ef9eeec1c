use rusqlite::types::{ToSql, ToSqlOutput, Value, ValueRef};
use starmart_types::{
    constants::{DATE_FORMAT, TIMESTAMP_FORMAT},
    rust_decimal::prelude::ToPrimitive,
    types::Field,
};

/// Binds a [`Field`] as a SQLite parameter.
///
/// Decimals are stored as REAL, timestamps and dates as ISO text.
pub struct SqliteField<'a>(pub &'a Field);

fn conversion_failure(message: String) -> rusqlite::Error {
    rusqlite::Error::ToSqlConversionFailure(message.into())
}

impl ToSql for SqliteField<'_> {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        let value = match self.0 {
            Field::UInt(v) => Value::Integer(
                i64::try_from(*v)
                    .map_err(|_| conversion_failure(format!("{v} does not fit in INTEGER")))?,
            ),
            Field::Int(v) => Value::Integer(*v),
            Field::Float(v) => Value::Real(v.0),
            Field::Boolean(v) => Value::Integer(i64::from(*v)),
            Field::String(v) => return Ok(ToSqlOutput::Borrowed(ValueRef::Text(v.as_bytes()))),
            Field::Decimal(v) => Value::Real(
                v.to_f64()
                    .ok_or_else(|| conversion_failure(format!("{v} does not fit in REAL")))?,
            ),
            Field::Timestamp(v) => Value::Text(v.format(TIMESTAMP_FORMAT).to_string()),
            Field::Date(v) => Value::Text(v.format(DATE_FORMAT).to_string()),
            Field::Null => Value::Null,
        };
        Ok(ToSqlOutput::Owned(value))
    }
}
