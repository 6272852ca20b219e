//! Custom tracing Layer that writes through a quill [`Logger`].
//!
//! Lets code instrumented with `tracing` macros share one JSON line format
//! with code calling the logger directly.
//!
//! ```ignore
//! use quill_core::{layer::QuillLayer, Field, Logger};
//! use tracing_subscriber::prelude::*;
//!
//! let logger = Logger::builder().fields([Field::string("service", "api")]).build();
//! tracing_subscriber::registry()
//!     .with(QuillLayer::new(logger))
//!     .init();
//!
//! tracing::warn!(retries = 3, "Upstream slow");
//! ```

use std::fmt::Write as FmtWrite;

use tracing::field::{Field as TracingField, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::Layer;

use crate::field::Field;
use crate::level::Level;
use crate::logger::Logger;

/// A tracing Layer that encodes events with a quill [`Logger`].
///
/// `TRACE` and `DEBUG` map to [`Level::Debug`]. Events below the logger's
/// level are dropped before their fields are visited.
pub struct QuillLayer {
    logger: Logger,
}

impl QuillLayer {
    /// Route events through `logger`.
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }

    /// The logger events are written with.
    pub fn logger(&self) -> &Logger {
        &self.logger
    }
}

fn map_level(level: &tracing::Level) -> Level {
    match *level {
        tracing::Level::ERROR => Level::Error,
        tracing::Level::WARN => Level::Warn,
        tracing::Level::INFO => Level::Info,
        _ => Level::Debug,
    }
}

impl<S> Layer<S> for QuillLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let level = map_level(metadata.level());
        if !self.logger.enabled(level) {
            return;
        }

        let mut visitor = FieldVisitor::new();
        visitor.fields.push(Field::string("target", metadata.target().to_string()));
        event.record(&mut visitor);

        let message = visitor.message.unwrap_or_default();

        // Ignore errors to avoid panics in logging
        let _ = self.logger.log(level, &message, &visitor.fields);
    }
}

/// Visitor that turns tracing values into typed fields.
struct FieldVisitor {
    message: Option<String>,
    fields: Vec<Field>,
}

impl FieldVisitor {
    fn new() -> Self {
        Self {
            message: None,
            fields: Vec::new(),
        }
    }
}

impl Visit for FieldVisitor {
    fn record_debug(&mut self, field: &TracingField, value: &dyn std::fmt::Debug) {
        let mut buf = String::new();
        let _ = write!(&mut buf, "{:?}", value);

        if field.name() == "message" {
            self.message = Some(buf);
        } else {
            self.fields.push(Field::string(field.name(), buf));
        }
    }

    fn record_str(&mut self, field: &TracingField, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.fields.push(Field::string(field.name(), value.to_string()));
        }
    }

    fn record_i64(&mut self, field: &TracingField, value: i64) {
        self.fields.push(Field::int(field.name(), value));
    }

    fn record_u64(&mut self, field: &TracingField, value: u64) {
        self.fields.push(Field::uint(field.name(), value));
    }

    fn record_bool(&mut self, field: &TracingField, value: bool) {
        self.fields.push(Field::bool(field.name(), value));
    }

    fn record_f64(&mut self, field: &TracingField, value: f64) {
        self.fields.push(Field::float(field.name(), value));
    }

    fn record_error(&mut self, field: &TracingField, value: &(dyn std::error::Error + 'static)) {
        self.fields.push(Field::string(field.name(), value.to_string()));
    }
}
