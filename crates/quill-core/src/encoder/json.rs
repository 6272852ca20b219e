//! Reflection-free JSON line encoder.
//!
//! Output is one JSON object per entry, newline-terminated:
//!
//! ```text
//! {"level":"info","ts":0,"msg":"hello","user":"jane","visits":42}
//! ```
//!
//! `level`, `ts` and `msg` always come first (in that order, `ts` may be
//! dropped), followed by accumulated fields in insertion order.

use std::fmt::Write as _;
use std::io;
use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::{Encoder, Entry, KeyValue, LogMarshaler};
use crate::error::LogResult;

/// How the entry timestamp is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeFormat {
    /// Seconds since the Unix epoch as a JSON number.
    #[default]
    Epoch,
    /// RFC 3339 string, e.g. `1970-01-01T00:00:00Z`.
    Rfc3339,
    /// No timestamp key at all.
    None,
}

/// How the entry level is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelFormat {
    /// Canonical lowercase name.
    #[default]
    Text,
    /// Numeric code (`Info` is 0).
    Numeric,
}

#[derive(Debug)]
struct JsonConfig {
    level_key: String,
    time_key: String,
    message_key: String,
    time_format: TimeFormat,
    level_format: LevelFormat,
}

/// JSON implementation of [`Encoder`].
///
/// Cloning copies the accumulated field bytes; the key/format configuration
/// is immutable and shared.
#[derive(Debug, Clone)]
pub struct JsonEncoder {
    bytes: String,
    open_namespaces: usize,
    config: Arc<JsonConfig>,
}

impl Default for JsonEncoder {
    fn default() -> Self {
        JsonEncoderBuilder::default().build()
    }
}

impl JsonEncoder {
    /// Encoder with the default keys (`level`, `ts`, `msg`), epoch
    /// timestamps and text levels.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from the defaults and override keys or formats.
    pub fn builder() -> JsonEncoderBuilder {
        JsonEncoderBuilder::default()
    }

    /// The accumulated field body, without framing.
    pub fn fields_json(&self) -> &str {
        &self.bytes
    }

    fn add_separator(&mut self) {
        match self.bytes.as_bytes().last() {
            None | Some(b'{') => {}
            Some(_) => self.bytes.push(','),
        }
    }

    fn add_key(&mut self, key: &str) {
        self.add_separator();
        write_escaped(&mut self.bytes, key);
        self.bytes.push(':');
    }
}

impl KeyValue for JsonEncoder {
    fn add_string(&mut self, key: &str, value: &str) {
        self.add_key(key);
        write_escaped(&mut self.bytes, value);
    }

    fn add_bool(&mut self, key: &str, value: bool) {
        self.add_key(key);
        self.bytes.push_str(if value { "true" } else { "false" });
    }

    fn add_int(&mut self, key: &str, value: i64) {
        self.add_key(key);
        let _ = write!(self.bytes, "{}", value);
    }

    fn add_uint(&mut self, key: &str, value: u64) {
        self.add_key(key);
        let _ = write!(self.bytes, "{}", value);
    }

    fn add_float(&mut self, key: &str, value: f64) {
        self.add_key(key);
        write_float(&mut self.bytes, value);
    }

    fn add_marshaler(&mut self, key: &str, value: &dyn LogMarshaler) -> LogResult<()> {
        let mark = self.bytes.len();
        let depth = self.open_namespaces;

        self.open_namespace(key);
        match value.marshal_log(&mut *self) {
            Ok(()) => {
                self.close_namespace();
                Ok(())
            }
            Err(err) => {
                self.bytes.truncate(mark);
                self.open_namespaces = depth;
                Err(err)
            }
        }
    }
}

impl Encoder for JsonEncoder {
    fn add_time(&mut self, key: &str, value: DateTime<Utc>) {
        match value.timestamp_nanos_opt() {
            Some(nanos) => self.add_int(key, nanos),
            None => self.add_string(key, &value.to_rfc3339_opts(SecondsFormat::Nanos, true)),
        }
    }

    fn open_namespace(&mut self, key: &str) {
        self.add_key(key);
        self.bytes.push('{');
        self.open_namespaces += 1;
    }

    fn close_namespace(&mut self) {
        if self.open_namespaces > 0 {
            self.bytes.push('}');
            self.open_namespaces -= 1;
        }
    }

    fn clone_encoder(&self) -> Box<dyn Encoder> {
        Box::new(self.clone())
    }

    fn write_entry(&self, sink: &mut dyn io::Write, entry: &Entry<'_>) -> LogResult<()> {
        let config = &self.config;
        let mut line = String::with_capacity(self.bytes.len() + entry.message.len() + 64);

        line.push('{');
        write_escaped(&mut line, &config.level_key);
        line.push(':');
        match config.level_format {
            LevelFormat::Text => write_escaped(&mut line, entry.level.as_str()),
            LevelFormat::Numeric => {
                let _ = write!(line, "{}", entry.level.code());
            }
        }

        match config.time_format {
            TimeFormat::Epoch => {
                line.push(',');
                write_escaped(&mut line, &config.time_key);
                line.push(':');
                let secs = entry.time.timestamp() as f64
                    + f64::from(entry.time.timestamp_subsec_nanos()) / 1e9;
                write_float(&mut line, secs);
            }
            TimeFormat::Rfc3339 => {
                line.push(',');
                write_escaped(&mut line, &config.time_key);
                line.push(':');
                write_escaped(
                    &mut line,
                    &entry.time.to_rfc3339_opts(SecondsFormat::Secs, true),
                );
            }
            TimeFormat::None => {}
        }

        line.push(',');
        write_escaped(&mut line, &config.message_key);
        line.push(':');
        write_escaped(&mut line, entry.message);

        if !self.bytes.is_empty() {
            line.push(',');
            line.push_str(&self.bytes);
        }
        for _ in 0..self.open_namespaces {
            line.push('}');
        }
        line.push_str("}\n");

        sink.write_all(line.as_bytes())?;
        Ok(())
    }
}

/// Construction-time options for [`JsonEncoder`].
#[derive(Debug, Clone)]
pub struct JsonEncoderBuilder {
    level_key: String,
    time_key: String,
    message_key: String,
    time_format: TimeFormat,
    level_format: LevelFormat,
}

impl Default for JsonEncoderBuilder {
    fn default() -> Self {
        Self {
            level_key: "level".to_string(),
            time_key: "ts".to_string(),
            message_key: "msg".to_string(),
            time_format: TimeFormat::Epoch,
            level_format: LevelFormat::Text,
        }
    }
}

impl JsonEncoderBuilder {
    /// Key for the level name. Defaults to `level`.
    pub fn level_key(mut self, key: impl Into<String>) -> Self {
        self.level_key = key.into();
        self
    }

    /// Key for the timestamp. Defaults to `ts`.
    pub fn time_key(mut self, key: impl Into<String>) -> Self {
        self.time_key = key.into();
        self
    }

    /// Key for the message. Defaults to `msg`.
    pub fn message_key(mut self, key: impl Into<String>) -> Self {
        self.message_key = key.into();
        self
    }

    /// How `ts` is rendered.
    pub fn time_format(mut self, format: TimeFormat) -> Self {
        self.time_format = format;
        self
    }

    /// Drop the timestamp key entirely. Handy in tests.
    pub fn no_time(self) -> Self {
        self.time_format(TimeFormat::None)
    }

    /// Level as text or as its numeric code.
    pub fn level_format(mut self, format: LevelFormat) -> Self {
        self.level_format = format;
        self
    }

    /// Shorthand for `level_format(LevelFormat::Numeric)`.
    pub fn numeric_level(self) -> Self {
        self.level_format(LevelFormat::Numeric)
    }

    /// Finish with empty context.
    pub fn build(self) -> JsonEncoder {
        JsonEncoder {
            bytes: String::new(),
            open_namespaces: 0,
            config: Arc::new(JsonConfig {
                level_key: self.level_key,
                time_key: self.time_key,
                message_key: self.message_key,
                time_format: self.time_format,
                level_format: self.level_format,
            }),
        }
    }
}

fn write_float(buf: &mut String, value: f64) {
    if value.is_nan() {
        buf.push_str("\"NaN\"");
    } else if value == f64::INFINITY {
        buf.push_str("\"+Inf\"");
    } else if value == f64::NEG_INFINITY {
        buf.push_str("\"-Inf\"");
    } else {
        let _ = write!(buf, "{}", value);
    }
}

/// Append `s` as a quoted JSON string.
fn write_escaped(buf: &mut String, s: &str) {
    buf.push('"');
    let mut start = 0;
    for (i, byte) in s.bytes().enumerate() {
        let escape = match byte {
            b'"' => "\\\"",
            b'\\' => "\\\\",
            b'\n' => "\\n",
            b'\r' => "\\r",
            b'\t' => "\\t",
            0x00..=0x1f => "",
            _ => continue,
        };
        buf.push_str(&s[start..i]);
        if escape.is_empty() {
            let _ = write!(buf, "\\u{:04x}", byte);
        } else {
            buf.push_str(escape);
        }
        start = i + 1;
    }
    buf.push_str(&s[start..]);
    buf.push('"');
}
