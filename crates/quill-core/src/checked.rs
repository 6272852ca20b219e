//! Two-phase log-then-write gate.
//!
//! Checking first lets a call site skip building expensive fields when the
//! level is disabled:
//!
//! ```ignore
//! let cm = logger.check(Level::Debug, "cache state");
//! if cm.ok() {
//!     cm.write(&[Field::stack()])?;
//! }
//! ```

use crate::error::LogResult;
use crate::field::Field;
use crate::level::Level;
use crate::logger::Logger;

/// The outcome of [`Logger::check`]: whether the level is enabled, plus what
/// is needed to write the entry later.
///
/// Consumed by [`CheckedMessage::write`], so it can be written at most once.
#[must_use = "a checked message does nothing unless written"]
#[derive(Debug)]
pub struct CheckedMessage<'a> {
    logger: &'a Logger,
    level: Level,
    message: &'a str,
    ready: bool,
}

impl<'a> CheckedMessage<'a> {
    pub(crate) fn new(logger: &'a Logger, level: Level, message: &'a str, ready: bool) -> Self {
        Self {
            logger,
            level,
            message,
            ready,
        }
    }

    /// True if writing this message would produce output.
    pub fn ok(&self) -> bool {
        self.ready
    }

    /// The level this message was checked at.
    pub fn level(&self) -> Level {
        self.level
    }

    /// Encode `fields` after the logger's context and emit the entry.
    /// Does nothing if the message is not ready.
    #[track_caller]
    pub fn write(self, fields: &[Field]) -> LogResult<()> {
        if !self.ready {
            return Ok(());
        }
        self.logger.log(self.level, self.message, fields)
    }

    /// Like [`CheckedMessage::write`], but only builds the fields when the
    /// message is ready.
    #[track_caller]
    pub fn write_with<F>(self, fields: F) -> LogResult<()>
    where
        F: FnOnce() -> Vec<Field>,
    {
        if !self.ready {
            return Ok(());
        }
        self.logger.log(self.level, self.message, &fields())
    }
}
