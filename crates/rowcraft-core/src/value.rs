//! Bound parameter values.
//!
//! Every value reaching the execution layer travels as a positional `?`
//! parameter, never spliced into the statement text.

use chrono::{DateTime, Utc};

/// A value bound to a positional placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// SQL `NULL`.
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Blob(Vec<u8>),
    /// A UTC instant.
    Timestamp(DateTime<Utc>),
}

/// Conversion into a bound parameter.
///
/// Used by [`Statement::id`](crate::Statement::id) and
/// [`Statement::in_values`](crate::Statement::in_values).
pub trait ToSqlValue {
    /// Consumes the value and returns its parameter form.
    fn to_sql_value(self) -> SqlValue;
}

macro_rules! widen_to_sql_value {
    ($variant:ident: $($t:ty),+) => {
        $(
            impl ToSqlValue for $t {
                fn to_sql_value(self) -> SqlValue {
                    SqlValue::$variant(self.into())
                }
            }
        )+
    };
}

widen_to_sql_value!(Int: i8, i16, i32, u8, u16, u32);
widen_to_sql_value!(Float: f32);

impl ToSqlValue for i64 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Int(self)
    }
}

impl ToSqlValue for f64 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Float(self)
    }
}

impl ToSqlValue for bool {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Bool(self)
    }
}

impl ToSqlValue for &str {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(self.to_owned())
    }
}

impl ToSqlValue for String {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(self)
    }
}

impl ToSqlValue for Vec<u8> {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Blob(self)
    }
}

impl ToSqlValue for DateTime<Utc> {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Timestamp(self)
    }
}

impl ToSqlValue for SqlValue {
    fn to_sql_value(self) -> Self {
        self
    }
}

impl<T: ToSqlValue> ToSqlValue for Option<T> {
    fn to_sql_value(self) -> SqlValue {
        self.map_or(SqlValue::Null, ToSqlValue::to_sql_value)
    }
}
