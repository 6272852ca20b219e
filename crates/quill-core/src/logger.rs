//! Leveled logger with pre-encoded context.
//!
//! A [`Logger`] owns an encoder that already holds its context fields. Every
//! call clones that encoder, adds the call's fields to the clone, and writes
//! the framed line to the shared sink. [`Logger::with`] derives a child the
//! same way, so a parent's context is never touched after construction.

use std::fmt;
use std::io;
use std::panic::Location;
use std::sync::Arc;

use crate::checked::CheckedMessage;
use crate::clock::{Clock, StubClock, SystemClock};
use crate::encoder::{Encoder, Entry, JsonEncoder};
use crate::error::LogResult;
use crate::field::Field;
use crate::level::Level;
use crate::sink::{SharedSink, WriteSyncer};

/// A structured, leveled logger.
///
/// Cheap to share across threads; clones and children write to the same
/// sink.
#[derive(Clone)]
pub struct Logger {
    level: Level,
    encoder: Box<dyn Encoder>,
    sink: SharedSink,
    clock: Arc<dyn Clock>,
    add_caller: bool,
    add_stacks: Option<Level>,
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.level)
            .field("add_caller", &self.add_caller)
            .field("add_stacks", &self.add_stacks)
            .finish_non_exhaustive()
    }
}

impl Logger {
    /// Start configuring a logger. See [`LoggerBuilder`] for defaults.
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::default()
    }

    /// JSON logger writing `Info` and above to stdout.
    pub fn new_json() -> Self {
        Self::builder().build()
    }

    /// The minimum enabled level.
    pub fn level(&self) -> Level {
        self.level
    }

    /// True if entries at `level` would be written.
    pub fn enabled(&self, level: Level) -> bool {
        level.enabled(self.level)
    }

    /// Derive a child logger carrying `fields` in addition to this logger's
    /// context. The child shares the sink, level and clock.
    pub fn with(&self, fields: &[Field]) -> Logger {
        let mut encoder = self.encoder.clone_encoder();
        for field in fields {
            field.add_to(encoder.as_mut());
        }
        Logger {
            level: self.level,
            encoder,
            sink: self.sink.clone(),
            clock: Arc::clone(&self.clock),
            add_caller: self.add_caller,
            add_stacks: self.add_stacks,
        }
    }

    /// Gate on `level` without building any fields.
    ///
    /// `Panic` and `Fatal` are always ready, since writing them terminates
    /// regardless of the threshold.
    pub fn check<'a>(&'a self, level: Level, message: &'a str) -> CheckedMessage<'a> {
        let ready = matches!(level, Level::Panic | Level::Fatal) || self.enabled(level);
        CheckedMessage::new(self, level, message, ready)
    }

    /// Log at [`Level::Debug`].
    #[track_caller]
    pub fn debug(&self, message: &str, fields: &[Field]) -> LogResult<()> {
        self.log(Level::Debug, message, fields)
    }

    /// Log at [`Level::Info`].
    #[track_caller]
    pub fn info(&self, message: &str, fields: &[Field]) -> LogResult<()> {
        self.log(Level::Info, message, fields)
    }

    /// Log at [`Level::Warn`].
    #[track_caller]
    pub fn warn(&self, message: &str, fields: &[Field]) -> LogResult<()> {
        self.log(Level::Warn, message, fields)
    }

    /// Log at [`Level::Error`].
    #[track_caller]
    pub fn error(&self, message: &str, fields: &[Field]) -> LogResult<()> {
        self.log(Level::Error, message, fields)
    }

    /// Write the entry (if enabled), sync the sink, then panic with `message`.
    #[track_caller]
    pub fn panic(&self, message: &str, fields: &[Field]) -> ! {
        if self.enabled(Level::Panic) {
            let _ = self.emit(Level::Panic, message, fields);
        }
        let _ = self.sink.sync();
        panic!("{}", message)
    }

    /// Write the entry, sync the sink, then exit the process with status 1.
    #[track_caller]
    pub fn fatal(&self, message: &str, fields: &[Field]) -> ! {
        let _ = self.emit(Level::Fatal, message, fields);
        let _ = self.sink.sync();
        std::process::exit(1)
    }

    /// Log at an arbitrary level. `Panic` and `Fatal` terminate as their
    /// dedicated entry points do.
    #[track_caller]
    pub fn log(&self, level: Level, message: &str, fields: &[Field]) -> LogResult<()> {
        match level {
            Level::Panic => self.panic(message, fields),
            Level::Fatal => self.fatal(message, fields),
            _ => {}
        }
        if !self.enabled(level) {
            return Ok(());
        }
        self.emit(level, message, fields)
    }

    /// Sync the shared sink.
    pub fn sync(&self) -> LogResult<()> {
        self.sink.sync()?;
        Ok(())
    }

    #[track_caller]
    fn emit(&self, level: Level, message: &str, fields: &[Field]) -> LogResult<()> {
        let mut encoder = self.encoder.clone_encoder();
        for field in fields {
            field.add_to(encoder.as_mut());
        }

        if self.add_caller {
            let caller = Location::caller();
            encoder.add_string("caller", &format!("{}:{}", caller.file(), caller.line()));
        }
        if let Some(min) = self.add_stacks {
            if level.enabled(min) {
                Field::stack().add_to(encoder.as_mut());
            }
        }

        let entry = Entry::new(level, self.clock.now(), message);
        encoder.write_entry(&mut &self.sink, &entry)
    }
}

/// Options for building a [`Logger`]. Later calls override earlier ones.
pub struct LoggerBuilder {
    level: Level,
    fields: Vec<Field>,
    sink: Option<Box<dyn WriteSyncer>>,
    encoder: Option<Box<dyn Encoder>>,
    clock: Arc<dyn Clock>,
    add_caller: bool,
    add_stacks: Option<Level>,
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self {
            level: Level::Info,
            fields: Vec::new(),
            sink: None,
            encoder: None,
            clock: Arc::new(SystemClock),
            add_caller: false,
            add_stacks: None,
        }
    }
}

impl LoggerBuilder {
    /// Minimum enabled level. Defaults to `Info`.
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Initial context fields, encoded once at build time.
    pub fn fields(mut self, fields: impl IntoIterator<Item = Field>) -> Self {
        self.fields = fields.into_iter().collect();
        self
    }

    /// Output sink. Defaults to stdout.
    pub fn output(mut self, sink: impl WriteSyncer + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Encoder flavor and its options. Defaults to [`JsonEncoder::new`].
    pub fn encoder(mut self, encoder: impl Encoder + 'static) -> Self {
        self.encoder = Some(Box::new(encoder));
        self
    }

    /// Time source for entry timestamps. Defaults to [`SystemClock`].
    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Freeze time at the Unix epoch for this logger and its children.
    pub fn stub_time(self) -> Self {
        self.clock(StubClock::epoch())
    }

    /// Append a `caller` field (`file:line`) to every entry.
    pub fn add_caller(mut self) -> Self {
        self.add_caller = true;
        self
    }

    /// Append a `stacktrace` field to entries at or above `level`.
    pub fn add_stacks(mut self, level: Level) -> Self {
        self.add_stacks = Some(level);
        self
    }

    /// Encode the initial context and assemble the logger.
    pub fn build(self) -> Logger {
        let mut encoder = self
            .encoder
            .unwrap_or_else(|| Box::new(JsonEncoder::new()));
        for field in &self.fields {
            field.add_to(encoder.as_mut());
        }
        let sink = self.sink.unwrap_or_else(|| Box::new(io::stdout()));

        Logger {
            level: self.level,
            encoder,
            sink: SharedSink::new(sink),
            clock: self.clock,
            add_caller: self.add_caller,
            add_stacks: self.add_stacks,
        }
    }
}
