//! Quill Core Library
//!
//! Leveled, structured JSON logging with reusable pre-encoded context.
//!
//! ## Overview
//!
//! A [`Logger`] turns a level, a message and a list of typed [`Field`]s into
//! one JSON line on its sink. Context attached with [`Logger::with`] is
//! encoded once and reused by every later call on the child logger.
//!
//! ## Core Principles
//!
//! - **No reflection**: fields are a closed tagged union that writes itself
//!   straight into encoder primitives
//! - **Cheap disabled levels**: a call below the threshold returns before
//!   any encoder is cloned; [`Logger::check`] lets call sites skip building
//!   fields entirely
//! - **Immutable context**: deriving a child never mutates the parent
//!
//! ## Quick Start
//!
//! ```ignore
//! use quill_core::{Field, Logger};
//! use std::time::Duration;
//!
//! let logger = Logger::new_json();
//!
//! logger.warn("Log without structured data...", &[])?;
//! logger.warn(
//!     "Or use strongly-typed wrappers to add structured context.",
//!     &[
//!         Field::string("library", "quill"),
//!         Field::duration("latency", Duration::from_nanos(1)),
//!     ],
//! )?;
//!
//! let child = logger.with(&[
//!     Field::string("user", "jane@test.com"),
//!     Field::int("visits", 42),
//! ]);
//! child.error("Oh no!", &[])?;
//! ```

pub mod checked;
pub mod clock;
pub mod config;
pub mod encoder;
pub mod error;
pub mod field;
pub mod layer;
pub mod level;
pub mod logger;
pub mod sink;

// Re-exports
pub use checked::CheckedMessage;
pub use clock::{Clock, StubClock, SystemClock};
pub use config::{EncoderConfig, LoggerConfig};
pub use encoder::{
    Encoder, Entry, JsonEncoder, JsonEncoderBuilder, KeyValue, LevelFormat, LogMarshaler,
    MarshalFn, TimeFormat,
};
pub use error::{LogError, LogResult};
pub use field::{Field, FieldValue};
pub use layer::QuillLayer;
pub use level::Level;
pub use logger::{Logger, LoggerBuilder};
pub use sink::{AddSync, SharedBuffer, WriteSyncer};
