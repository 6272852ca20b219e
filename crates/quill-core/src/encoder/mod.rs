//! Encoder abstraction.
//!
//! An [`Encoder`] accumulates key/value pairs in insertion order and frames
//! them into a complete entry on [`Encoder::write_entry`]. Loggers keep one
//! encoder per context and clone it for every call, so an encoder that has
//! been cloned must never share mutable state with its clone.
//!
//! Duplicate keys are written as many times as they are added.

pub mod json;

use std::io::Write;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::error::LogResult;
use crate::level::Level;

pub use json::{JsonEncoder, JsonEncoderBuilder, LevelFormat, TimeFormat};

/// Primitive key/value sink shared by encoders and user marshalers.
pub trait KeyValue {
    fn add_string(&mut self, key: &str, value: &str);
    fn add_bool(&mut self, key: &str, value: bool);
    fn add_int(&mut self, key: &str, value: i64);
    fn add_uint(&mut self, key: &str, value: u64);
    fn add_float(&mut self, key: &str, value: f64);

    /// Encode `value` as a nested object under `key`.
    ///
    /// If the marshaler fails, nothing it wrote is kept and the error is
    /// returned.
    fn add_marshaler(&mut self, key: &str, value: &dyn LogMarshaler) -> LogResult<()>;
}

/// Types that know how to write themselves as a set of key/value pairs.
pub trait LogMarshaler: Send + Sync {
    fn marshal_log(&self, kv: &mut dyn KeyValue) -> LogResult<()>;
}

/// Adapter turning a closure into a [`LogMarshaler`].
pub struct MarshalFn<F>(pub F);

impl<F> LogMarshaler for MarshalFn<F>
where
    F: Fn(&mut dyn KeyValue) -> LogResult<()> + Send + Sync,
{
    fn marshal_log(&self, kv: &mut dyn KeyValue) -> LogResult<()> {
        (self.0)(kv)
    }
}

/// The framing data of a single log call.
#[derive(Debug, Clone, Copy)]
pub struct Entry<'a> {
    pub level: Level,
    pub time: DateTime<Utc>,
    pub message: &'a str,
}

impl<'a> Entry<'a> {
    /// Frame for one log call.
    pub fn new(level: Level, time: DateTime<Utc>, message: &'a str) -> Self {
        Self {
            level,
            time,
            message,
        }
    }
}

/// A cloneable accumulator of fields that can frame and emit an entry.
pub trait Encoder: KeyValue + Send + Sync {
    /// Durations are written as an integer count of nanoseconds.
    fn add_duration(&mut self, key: &str, value: Duration) {
        self.add_int(key, i64::try_from(value.as_nanos()).unwrap_or(i64::MAX));
    }

    fn add_time(&mut self, key: &str, value: DateTime<Utc>);

    fn add_error(&mut self, key: &str, value: &str) {
        self.add_string(key, value);
    }

    /// Start a nested object; later fields land inside it until closed.
    fn open_namespace(&mut self, key: &str);

    /// Close the innermost open namespace. No-op if none is open.
    fn close_namespace(&mut self);

    /// Independent deep copy of the accumulated state.
    fn clone_encoder(&self) -> Box<dyn Encoder>;

    /// Frame the accumulated fields with level, time and message and write
    /// the result to `sink` with a single `write_all`.
    fn write_entry(&self, sink: &mut dyn Write, entry: &Entry<'_>) -> LogResult<()>;
}

impl Clone for Box<dyn Encoder> {
    fn clone(&self) -> Self {
        self.clone_encoder()
    }
}
