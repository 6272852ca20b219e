//! Serde-loadable logger configuration.
//!
//! Every key is optional; missing keys take the same defaults as
//! [`Logger::builder`](crate::Logger::builder).
//!
//! ```json
//! {
//!   "level": "debug",
//!   "caller": true,
//!   "stacks": "error",
//!   "encoder": { "message_key": "@message", "time_format": "rfc3339" }
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::encoder::{JsonEncoder, LevelFormat, TimeFormat};
use crate::error::LogResult;
use crate::level::Level;
use crate::logger::{Logger, LoggerBuilder};

/// Environment variable that overrides the configured level.
pub const LEVEL_ENV: &str = "QUILL_LEVEL";

/// Root configuration for a logger.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Minimum enabled level.
    pub level: Level,

    /// Append a `caller` field to every entry.
    pub caller: bool,

    /// Append a `stacktrace` field at or above this level.
    pub stacks: Option<Level>,

    /// JSON encoder settings.
    pub encoder: EncoderConfig,
}

/// JSON encoder settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EncoderConfig {
    pub level_key: String,
    pub time_key: String,
    pub message_key: String,
    pub time_format: TimeFormat,
    pub level_format: LevelFormat,
}

impl Default for EncoderConfig {
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

impl EncoderConfig {
    /// A [`JsonEncoder`] with these keys and formats.
    pub fn build(&self) -> JsonEncoder {
        JsonEncoder::builder()
            .level_key(self.level_key.as_str())
            .time_key(self.time_key.as_str())
            .message_key(self.message_key.as_str())
            .time_format(self.time_format)
            .level_format(self.level_format)
            .build()
    }
}

impl LoggerConfig {
    /// Parse a JSON document.
    pub fn from_json(text: &str) -> LogResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Override the level from [`LEVEL_ENV`] if it is set.
    ///
    /// An unrecognized value is returned as `InvalidLevel` and the configured
    /// level is kept.
    pub fn apply_env(&mut self) -> LogResult<()> {
        match std::env::var(LEVEL_ENV) {
            Ok(value) => self.level.unmarshal_text(value.as_bytes()),
            Err(_) => Ok(()),
        }
    }

    /// A builder preloaded with these settings. Sink and clock are left to
    /// the caller.
    pub fn into_builder(self) -> LoggerBuilder {
        let mut builder = Logger::builder()
            .level(self.level)
            .encoder(self.encoder.build());
        if self.caller {
            builder = builder.add_caller();
        }
        if let Some(level) = self.stacks {
            builder = builder.add_stacks(level);
        }
        builder
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LogError;
    use crate::sink::SharedBuffer;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = LoggerConfig::from_json("{}").unwrap();
        assert_eq!(config.level, Level::Info);
        assert!(!config.caller);
        assert!(config.stacks.is_none());
        assert_eq!(config.encoder.message_key, "msg");
        assert_eq!(config.encoder.time_format, TimeFormat::Epoch);
    }

    #[test]
    fn test_full_document() {
        let config = LoggerConfig::from_json(
            r#"{
                "level": "debug",
                "stacks": "error",
                "encoder": {
                    "level_key": "@level",
                    "message_key": "@message",
                    "time_format": "none",
                    "level_format": "numeric"
                }
            }"#,
        )
        .unwrap();

        assert_eq!(config.level, Level::Debug);
        assert_eq!(config.stacks, Some(Level::Error));

        let buffer = SharedBuffer::new();
        let logger = config.into_builder().output(buffer.clone()).build();
        logger.debug("configured", &[]).unwrap();
        assert_eq!(buffer.lines(), vec![r#"{"@level":-1,"@message":"configured"}"#]);
    }

    #[test]
    fn test_bad_level_is_config_error() {
        let err = LoggerConfig::from_json(r#"{"level":"verbose"}"#).unwrap_err();
        assert!(matches!(err, LogError::Config(_)));
    }

    #[test]
    fn test_env_override() {
        let mut config = LoggerConfig::default();

        std::env::set_var(LEVEL_ENV, "warn");
        config.apply_env().unwrap();
        assert_eq!(config.level, Level::Warn);

        std::env::set_var(LEVEL_ENV, "LOUD");
        assert!(matches!(config.apply_env(), Err(LogError::InvalidLevel(_))));
        assert_eq!(config.level, Level::Warn);

        std::env::remove_var(LEVEL_ENV);
        config.apply_env().unwrap();
        assert_eq!(config.level, Level::Warn);
    }
}
