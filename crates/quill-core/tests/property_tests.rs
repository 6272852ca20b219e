//! Property-based tests for levels, fields and loggers
//!
//! Uses proptest to verify that arbitrary field combinations always encode
//! to one well-formed JSON line, and that context derivation is pure.

use std::io;
use std::time::Duration;

use chrono::{DateTime, Utc};
use proptest::prelude::*;
use quill_core::{Field, Level, LogError, Logger, SharedBuffer};

// ============================================================================
// Strategy Generators
// ============================================================================

fn level_strategy() -> impl Strategy<Value = Level> {
    prop::sample::select(Level::ALL.to_vec())
}

fn enabled_level_strategy() -> impl Strategy<Value = Level> {
    prop::sample::select(vec![Level::Debug, Level::Info, Level::Warn, Level::Error])
}

fn key_strategy() -> impl Strategy<Value = String> {
    any::<String>()
}

fn leaf_field_strategy() -> impl Strategy<Value = Field> {
    prop_oneof![
        (key_strategy(), any::<String>()).prop_map(|(k, v)| Field::string(k, v)),
        (key_strategy(), any::<i64>()).prop_map(|(k, v)| Field::int(k, v)),
        (key_strategy(), any::<u64>()).prop_map(|(k, v)| Field::uint(k, v)),
        (key_strategy(), any::<f64>()).prop_map(|(k, v)| Field::float(k, v)),
        (key_strategy(), any::<bool>()).prop_map(|(k, v)| Field::bool(k, v)),
        (key_strategy(), any::<u64>())
            .prop_map(|(k, v)| Field::duration(k, Duration::from_nanos(v))),
        // Covers both the nanosecond and the RFC 3339 fallback encodings
        (key_strategy(), -8_000_000_000_000i64..8_000_000_000_000i64).prop_filter_map(
            "representable instant",
            |(k, secs)| DateTime::<Utc>::from_timestamp(secs, 0).map(|t| Field::time(k, t))
        ),
        any::<String>().prop_map(|msg| Field::error(&io::Error::new(io::ErrorKind::Other, msg))),
        Just(Field::skip()),
    ]
}

/// Leaves plus nests up to a few levels deep
fn field_strategy() -> impl Strategy<Value = Field> {
    leaf_field_strategy().prop_recursive(3, 32, 4, |inner| {
        (key_strategy(), prop::collection::vec(inner, 0..4))
            .prop_map(|(k, children)| Field::nest(k, children))
    })
}

fn stubbed(buffer: &SharedBuffer, min: Level) -> Logger {
    Logger::builder()
        .output(buffer.clone())
        .level(min)
        .stub_time()
        .build()
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Every level survives a text round trip
    #[test]
    fn level_text_roundtrip(level in level_strategy()) {
        prop_assert_eq!(level.as_str().parse::<Level>().unwrap(), level);
    }

    /// Anything but the six canonical tokens is rejected and leaves the
    /// destination untouched
    #[test]
    fn unknown_level_text_rejected(text in any::<String>(), start in level_strategy()) {
        prop_assume!(Level::ALL.iter().all(|l| l.as_str() != text));

        let mut level = start;
        let err = level.unmarshal_text(text.as_bytes()).unwrap_err();
        prop_assert!(matches!(err, LogError::InvalidLevel(_)));
        prop_assert_eq!(level, start);
    }

    /// Any mix of fields produces exactly one parseable JSON object line
    #[test]
    fn output_is_one_json_line(
        level in enabled_level_strategy(),
        message in any::<String>(),
        context in prop::collection::vec(field_strategy(), 0..4),
        fields in prop::collection::vec(field_strategy(), 0..6),
    ) {
        let buffer = SharedBuffer::new();
        let logger = stubbed(&buffer, Level::Debug).with(&context);

        logger.log(level, &message, &fields).unwrap();

        let contents = buffer.contents();
        prop_assert!(contents.ends_with('\n'));
        let lines = buffer.lines();
        prop_assert_eq!(lines.len(), 1);

        let prefix = format!("{{\"level\":\"{}\",\"ts\":0,\"msg\":", level);
        prop_assert!(lines[0].starts_with(&prefix));

        let value: serde_json::Value = serde_json::from_str(&lines[0])
            .map_err(|e| TestCaseError::fail(format!("{}: {}", e, lines[0])))?;
        prop_assert!(value.is_object());
        prop_assert_eq!(value["msg"].as_str(), Some(message.as_str()));
    }

    /// Deriving a child never changes what the parent writes
    #[test]
    fn with_never_alters_parent(
        context in prop::collection::vec(field_strategy(), 0..4),
        extra in prop::collection::vec(field_strategy(), 0..4),
    ) {
        let buffer = SharedBuffer::new();
        let parent = stubbed(&buffer, Level::Info).with(&context);

        parent.info("same", &[]).unwrap();
        let before = buffer.contents();
        buffer.clear();

        let child = parent.with(&extra);
        child.info("child", &extra).unwrap();
        buffer.clear();

        parent.info("same", &[]).unwrap();
        prop_assert_eq!(buffer.contents(), before);
    }

    /// Calls below the threshold never reach the sink
    #[test]
    fn disabled_levels_write_nothing(
        fields in prop::collection::vec(leaf_field_strategy(), 0..4),
    ) {
        let buffer = SharedBuffer::new();
        let logger = stubbed(&buffer, Level::Error);

        logger.debug("d", &fields).unwrap();
        logger.info("i", &fields).unwrap();
        logger.warn("w", &fields).unwrap();
        prop_assert!(!logger.check(Level::Warn, "w").ok());
        prop_assert!(buffer.contents().is_empty());
    }
}
