//! Conversions between value trees and caller types
//!
//! XML carries no scalar types, so every decoded leaf is a string.
//! [`FromValue`] impls for numbers and booleans parse that text; a leaf that
//! doesn't parse, or a container where a scalar was expected, is an
//! [`UnsupportedTargetShape`](crate::ErrorKind::UnsupportedTargetShape)
//! error.

use crate::error::{Error, Result};
use crate::value::{number_text, Array, Object, Value};

/// Build `Self` out of a decoded value tree
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Result<Self>;
}

/// Turn `self` into a value tree for encoding
pub trait ToValue {
    fn to_value(&self) -> Value;

    /// Root tag to use instead of the configured default
    fn root_name() -> Option<&'static str> {
        None
    }
}

fn mismatch<T>(expected: &str, found: &Value) -> Result<T> {
    Err(Error::unsupported_shape(expected, found.kind().name()))
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self> {
        Ok(value)
    }
}

impl FromValue for Object {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(obj) => Ok(obj),
            other => mismatch("object", &other),
        }
    }
}

impl FromValue for Array {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Array(arr) => Ok(arr),
            other => mismatch("array", &other),
        }
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::String(s) => Ok(s),
            Value::Bool(_) | Value::Number(_) => match value.scalar_text() {
                Some(text) => Ok(text.into_owned()),
                None => mismatch("string", &value),
            },
            other => mismatch("string", &other),
        }
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self> {
        match &value {
            Value::Bool(b) => Ok(*b),
            Value::String(s) => match s.trim() {
                "true" => Ok(true),
                "false" => Ok(false),
                _ => Err(Error::unsupported_shape("boolean", format!("string {s:?}"))),
            },
            _ => mismatch("boolean", &value),
        }
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self> {
        match &value {
            Value::Number(n) => Ok(*n),
            Value::String(s) => s
                .trim()
                .parse()
                .map_err(|_| Error::unsupported_shape("number", format!("string {s:?}"))),
            _ => mismatch("number", &value),
        }
    }
}

macro_rules! integer_from_value {
    ($($ty:ty),*) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: Value) -> Result<Self> {
                    let expected = stringify!($ty);
                    match &value {
                        Value::String(s) => s
                            .trim()
                            .parse()
                            .map_err(|_| Error::unsupported_shape(expected, format!("string {s:?}"))),
                        Value::Number(n) if n.fract() == 0.0 => n
                            .to_string()
                            .parse()
                            .map_err(|_| Error::unsupported_shape(expected, format!("number {n}"))),
                        _ => mismatch(expected, &value),
                    }
                }
            }
        )*
    };
}

integer_from_value!(i32, i64, u32, u64, usize);

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

/// Accepts an array, or a single value as a one-member list
impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Array(arr) => arr.into_iter().map(T::from_value).collect(),
            Value::Null => Ok(Vec::new()),
            other => Ok(vec![T::from_value(other)?]),
        }
    }
}

impl ToValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl ToValue for Object {
    fn to_value(&self) -> Value {
        Value::Object(self.clone())
    }
}

impl ToValue for Array {
    fn to_value(&self) -> Value {
        Value::Array(self.clone())
    }
}

impl ToValue for str {
    fn to_value(&self) -> Value {
        Value::from(self)
    }
}

impl ToValue for String {
    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }
}

impl ToValue for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

impl ToValue for f64 {
    fn to_value(&self) -> Value {
        Value::Number(*self)
    }
}

impl ToValue for i32 {
    fn to_value(&self) -> Value {
        Value::from(*self)
    }
}

impl ToValue for u32 {
    fn to_value(&self) -> Value {
        Value::from(*self)
    }
}

/// Integers wider than an f64 mantissa stay numbers only while the f64
/// prints back the same digits; otherwise the exact digits go out as text.
macro_rules! wide_integer_to_value {
    ($($ty:ty),*) => {
        $(
            impl ToValue for $ty {
                fn to_value(&self) -> Value {
                    let text = self.to_string();
                    match text.parse::<f64>() {
                        Ok(n) if number_text(n) == text => Value::Number(n),
                        _ => Value::String(text),
                    }
                }
            }
        )*
    };
}

wide_integer_to_value!(i64, u64, usize);

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> Value {
        self.as_ref().map_or(Value::Null, ToValue::to_value)
    }
}

impl<T: ToValue> ToValue for [T] {
    fn to_value(&self) -> Value {
        Value::Array(self.iter().map(ToValue::to_value).collect())
    }
}

impl<T: ToValue> ToValue for Vec<T> {
    fn to_value(&self) -> Value {
        self.as_slice().to_value()
    }
}
