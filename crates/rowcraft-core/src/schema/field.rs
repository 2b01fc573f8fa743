//! Per-kind field inspection.
//!
//! Each supported Rust type describes itself through [`ToField`], and the
//! resulting [`FieldValue`] owns the "is this field set?" rule for its kind.
//! Adding a kind means adding an impl, not editing a central switch.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use super::Entity;
use crate::value::SqlValue;

/// The runtime value of a mapped field, classified by kind.
pub enum FieldValue<'a> {
    /// An absent optional value.
    Null,
    /// A text value.
    Text(&'a str),
    /// An integer value.
    Int(i64),
    /// A point in time, normalised to UTC.
    Time(DateTime<Utc>),
    /// Another mapped entity referenced by this field.
    Reference(&'a dyn Entity),
    /// A kind that never takes part in derived conditions.
    Unsupported(&'static str),
}

impl FieldValue<'_> {
    /// Returns whether the value counts as "not specified".
    ///
    /// Empty text, zero integers and the unset instant (the Unix epoch,
    /// chrono's default) are unset. References and unsupported kinds are
    /// never unset here; the condition deriver decides on those separately.
    #[must_use]
    pub fn is_unset(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(s) => s.is_empty(),
            Self::Int(n) => *n == 0,
            Self::Time(t) => *t == DateTime::<Utc>::default(),
            Self::Reference(_) | Self::Unsupported(_) => false,
        }
    }

    /// Short name of the value's kind, used in diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Text(_) => "text",
            Self::Int(_) => "integer",
            Self::Time(_) => "time",
            Self::Reference(_) => "reference",
            Self::Unsupported(kind) => *kind,
        }
    }

    /// Converts a scalar value into a bindable parameter.
    ///
    /// Returns `None` for references and unsupported kinds.
    #[must_use]
    pub fn to_sql_value(&self) -> Option<SqlValue> {
        match self {
            Self::Null => Some(SqlValue::Null),
            Self::Text(s) => Some(SqlValue::Text((*s).to_string())),
            Self::Int(n) => Some(SqlValue::Int(*n)),
            Self::Time(t) => Some(SqlValue::Timestamp(*t)),
            Self::Reference(_) | Self::Unsupported(_) => None,
        }
    }
}

impl fmt::Debug for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "Null"),
            Self::Text(s) => f.debug_tuple("Text").field(s).finish(),
            Self::Int(n) => f.debug_tuple("Int").field(n).finish(),
            Self::Time(t) => f.debug_tuple("Time").field(t).finish(),
            Self::Reference(e) => f.debug_tuple("Reference").field(&e.describe().name).finish(),
            Self::Unsupported(kind) => f.debug_tuple("Unsupported").field(kind).finish(),
        }
    }
}

/// Describes a field's runtime value.
pub trait ToField {
    /// Classifies the value.
    fn to_field(&self) -> FieldValue<'_>;
}

impl ToField for String {
    fn to_field(&self) -> FieldValue<'_> {
        FieldValue::Text(self)
    }
}

impl ToField for str {
    fn to_field(&self) -> FieldValue<'_> {
        FieldValue::Text(self)
    }
}

macro_rules! impl_int_field {
    ($($t:ty),+) => {
        $(
            impl ToField for $t {
                fn to_field(&self) -> FieldValue<'_> {
                    FieldValue::Int(i64::from(*self))
                }
            }
        )+
    };
}

impl_int_field!(i8, i16, i32, i64, u8, u16, u32);

macro_rules! impl_unsupported_field {
    ($($t:ty => $kind:literal),+ $(,)?) => {
        $(
            impl ToField for $t {
                fn to_field(&self) -> FieldValue<'_> {
                    FieldValue::Unsupported($kind)
                }
            }
        )+
    };
}

// u64/usize cannot be bound losslessly as i64.
impl_unsupported_field!(
    bool => "bool",
    f32 => "f32",
    f64 => "f64",
    u64 => "u64",
    usize => "usize",
    Vec<u8> => "bytes",
);

impl ToField for DateTime<Utc> {
    fn to_field(&self) -> FieldValue<'_> {
        FieldValue::Time(*self)
    }
}

impl ToField for NaiveDateTime {
    fn to_field(&self) -> FieldValue<'_> {
        FieldValue::Time(self.and_utc())
    }
}

impl ToField for NaiveDate {
    fn to_field(&self) -> FieldValue<'_> {
        FieldValue::Time(NaiveDateTime::from(*self).and_utc())
    }
}

impl<T: ToField> ToField for Option<T> {
    fn to_field(&self) -> FieldValue<'_> {
        self.as_ref().map_or(FieldValue::Null, ToField::to_field)
    }
}
