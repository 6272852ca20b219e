//! Log severity levels.
//!
//! Levels are ordered `Debug < Info < Warn < Error < Panic < Fatal`. Their
//! numeric codes put `Info` at zero, so a default-initialized level is never
//! more or less verbose than `Info`.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::{LogError, LogResult};

/// Severity of a log entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(i8)]
pub enum Level {
    /// Verbose output, usually disabled in production.
    Debug = -1,
    /// The default level.
    #[default]
    Info = 0,
    /// More important than info, but no human needs to look at it right away.
    Warn = 1,
    /// High priority. If the application runs smoothly, there are none.
    Error = 2,
    /// Logs the entry, then panics.
    Panic = 3,
    /// Logs the entry, syncs the sink, then exits the process with status 1.
    Fatal = 4,
}

impl Level {
    /// Every level, least severe first.
    pub const ALL: [Level; 6] = [
        Level::Debug,
        Level::Info,
        Level::Warn,
        Level::Error,
        Level::Panic,
        Level::Fatal,
    ];

    /// Canonical lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Panic => "panic",
            Level::Fatal => "fatal",
        }
    }

    /// Numeric code used by numeric level rendering (`Info` is 0).
    pub fn code(self) -> i8 {
        self as i8
    }

    /// True if an entry at this level passes a `min` threshold.
    pub fn enabled(self, min: Level) -> bool {
        self >= min
    }

    /// Parse a canonical name. Matching is exact and case-sensitive.
    pub fn parse(text: &str) -> LogResult<Self> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str() == text)
            .ok_or_else(|| LogError::InvalidLevel(text.to_string()))
    }

    /// Overwrite `self` from raw text. On failure `self` is left untouched.
    pub fn unmarshal_text(&mut self, text: &[u8]) -> LogResult<()> {
        let text = std::str::from_utf8(text)
            .map_err(|_| LogError::InvalidLevel(String::from_utf8_lossy(text).into_owned()))?;
        *self = Self::parse(text)?;
        Ok(())
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Level {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Level {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct LevelVisitor;

        impl Visitor<'_> for LevelVisitor {
            type Value = Level;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("one of debug, info, warn, error, panic, fatal")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Level, E> {
                Level::parse(v).map_err(E::custom)
            }
        }

        deserializer.deserialize_str(LevelVisitor)
    }
}
