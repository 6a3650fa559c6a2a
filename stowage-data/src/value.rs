use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// A value bound to a named parameter.
///
/// Every variant carries an `Option` so that SQL `NULL` keeps a concrete
/// type; PostgreSQL refuses untyped nulls in most positions.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Bool(Option<bool>),
    Int(Option<i64>),
    Float(Option<f64>),
    Text(Option<String>),
    Bytes(Option<Vec<u8>>),
    Timestamp(Option<DateTime<Utc>>),
}

impl SqlValue {
    pub fn is_null(&self) -> bool {
        match self {
            SqlValue::Bool(v) => v.is_none(),
            SqlValue::Int(v) => v.is_none(),
            SqlValue::Float(v) => v.is_none(),
            SqlValue::Text(v) => v.is_none(),
            SqlValue::Bytes(v) => v.is_none(),
            SqlValue::Timestamp(v) => v.is_none(),
        }
    }
}

macro_rules! impl_from_value {
    ($variant:ident: $($ty:ty => $conv:expr),+ $(,)?) => {
        $(
            impl From<$ty> for SqlValue {
                fn from(value: $ty) -> Self {
                    SqlValue::$variant(Some($conv(value)))
                }
            }

            impl From<Option<$ty>> for SqlValue {
                fn from(value: Option<$ty>) -> Self {
                    SqlValue::$variant(value.map($conv))
                }
            }
        )+
    };
}

impl_from_value!(Bool: bool => |v| v);
impl_from_value!(Int: i64 => |v| v, i32 => i64::from, i16 => i64::from, u32 => i64::from);
impl_from_value!(Float: f64 => |v| v, f32 => f64::from);
impl_from_value!(Text: String => |v| v, &str => str::to_string, &String => String::clone);
impl_from_value!(Bytes: Vec<u8> => |v| v);
impl_from_value!(Timestamp: DateTime<Utc> => |v| v);

/// Named parameters for a statement, keyed without the leading `:`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    values: BTreeMap<String, SqlValue>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert or replace a parameter value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<SqlValue>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&SqlValue> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Build a [`Params`] map.
///
/// ```ignore
/// let args = params! { "role" => "AWP", "limit" => 10i64 };
/// ```
#[macro_export]
macro_rules! params {
    () => { $crate::Params::new() };
    ( $( $name:expr => $value:expr ),+ $(,)? ) => {
        $crate::Params::new() $( .with($name, $value) )+
    };
}
