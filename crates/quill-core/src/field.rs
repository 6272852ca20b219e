//! Typed key/value fields.
//!
//! A [`Field`] is an immutable key plus a tagged value. Encoding dispatches on
//! the tag straight into the [`Encoder`] primitives, so no value is ever
//! inspected structurally at runtime.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::encoder::{Encoder, LogMarshaler};

/// The value half of a [`Field`].
#[derive(Clone)]
pub enum FieldValue {
    String(Cow<'static, str>),
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
    Duration(Duration),
    Time(DateTime<Utc>),
    Error(String),
    /// Ordered children, encoded as a nested object.
    Nest(Vec<Field>),
    Marshaler(Arc<dyn LogMarshaler>),
    /// Encodes nothing.
    Skip,
}

impl fmt::Debug for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(v) => f.debug_tuple("String").field(v).finish(),
            FieldValue::Int(v) => f.debug_tuple("Int").field(v).finish(),
            FieldValue::Uint(v) => f.debug_tuple("Uint").field(v).finish(),
            FieldValue::Float(v) => f.debug_tuple("Float").field(v).finish(),
            FieldValue::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
            FieldValue::Duration(v) => f.debug_tuple("Duration").field(v).finish(),
            FieldValue::Time(v) => f.debug_tuple("Time").field(v).finish(),
            FieldValue::Error(v) => f.debug_tuple("Error").field(v).finish(),
            FieldValue::Nest(v) => f.debug_tuple("Nest").field(v).finish(),
            FieldValue::Marshaler(_) => f.write_str("Marshaler(..)"),
            FieldValue::Skip => f.write_str("Skip"),
        }
    }
}

/// A single typed key/value pair attached to a log entry.
#[derive(Debug, Clone)]
pub struct Field {
    key: Cow<'static, str>,
    value: FieldValue,
}

impl Field {
    fn new(key: impl Into<Cow<'static, str>>, value: FieldValue) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    /// A UTF-8 string value.
    pub fn string(key: impl Into<Cow<'static, str>>, value: impl Into<Cow<'static, str>>) -> Self {
        Self::new(key, FieldValue::String(value.into()))
    }

    /// A signed integer.
    pub fn int(key: impl Into<Cow<'static, str>>, value: i64) -> Self {
        Self::new(key, FieldValue::Int(value))
    }

    /// An unsigned integer.
    pub fn uint(key: impl Into<Cow<'static, str>>, value: u64) -> Self {
        Self::new(key, FieldValue::Uint(value))
    }

    /// A 64-bit float. Non-finite values are written as strings.
    pub fn float(key: impl Into<Cow<'static, str>>, value: f64) -> Self {
        Self::new(key, FieldValue::Float(value))
    }

    /// A boolean.
    pub fn bool(key: impl Into<Cow<'static, str>>, value: bool) -> Self {
        Self::new(key, FieldValue::Bool(value))
    }

    /// Encoded as an integer number of nanoseconds.
    pub fn duration(key: impl Into<Cow<'static, str>>, value: Duration) -> Self {
        Self::new(key, FieldValue::Duration(value))
    }

    /// Encoded as an integer number of nanoseconds since the Unix epoch.
    pub fn time(key: impl Into<Cow<'static, str>>, value: DateTime<Utc>) -> Self {
        Self::new(key, FieldValue::Time(value))
    }

    /// The error's display text under the key `error`.
    pub fn error(err: &dyn std::error::Error) -> Self {
        Self::new("error", FieldValue::Error(err.to_string()))
    }

    /// Renders `value` with its `Display` impl right away.
    pub fn stringer(key: impl Into<Cow<'static, str>>, value: &impl fmt::Display) -> Self {
        Self::new(key, FieldValue::String(Cow::Owned(value.to_string())))
    }

    /// Group `fields` under `key` as a nested object.
    pub fn nest(key: impl Into<Cow<'static, str>>, fields: impl IntoIterator<Item = Field>) -> Self {
        Self::new(key, FieldValue::Nest(fields.into_iter().collect()))
    }

    /// A user type that writes its own nested object.
    pub fn marshaler(key: impl Into<Cow<'static, str>>, value: impl LogMarshaler + 'static) -> Self {
        Self::new(key, FieldValue::Marshaler(Arc::new(value)))
    }

    /// Captures the current backtrace under the key `stacktrace`.
    ///
    /// Capturing is expensive; guard it with [`crate::Logger::check`].
    pub fn stack() -> Self {
        let trace = std::backtrace::Backtrace::force_capture();
        Self::new("stacktrace", FieldValue::String(Cow::Owned(trace.to_string())))
    }

    /// A placeholder that writes nothing.
    pub fn skip() -> Self {
        Self::new("", FieldValue::Skip)
    }

    /// The field's key, empty for [`Field::skip`].
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The tagged value.
    pub fn value(&self) -> &FieldValue {
        &self.value
    }

    /// Write this field into `enc`.
    ///
    /// A marshaler that fails is replaced by a `<key>Error` string carrying
    /// the error text.
    pub fn add_to(&self, enc: &mut dyn Encoder) {
        let key: &str = &self.key;
        match &self.value {
            FieldValue::String(v) => enc.add_string(key, v),
            FieldValue::Int(v) => enc.add_int(key, *v),
            FieldValue::Uint(v) => enc.add_uint(key, *v),
            FieldValue::Float(v) => enc.add_float(key, *v),
            FieldValue::Bool(v) => enc.add_bool(key, *v),
            FieldValue::Duration(v) => enc.add_duration(key, *v),
            FieldValue::Time(v) => enc.add_time(key, *v),
            FieldValue::Error(v) => enc.add_error(key, v),
            FieldValue::Nest(children) => {
                enc.open_namespace(key);
                for child in children {
                    child.add_to(enc);
                }
                enc.close_namespace();
            }
            FieldValue::Marshaler(m) => {
                if let Err(err) = enc.add_marshaler(key, m.as_ref()) {
                    tracing::debug!(key, error = %err, "Field failed to marshal");
                    enc.add_string(&format!("{}Error", key), &err.to_string());
                }
            }
            FieldValue::Skip => {}
        }
    }
}
