//! Exact-output scenarios for the JSON logger
//!
//! Every logger here uses a stubbed epoch clock so `ts` renders as `0`.

use std::fs;
use std::time::Duration;

use quill_core::{Field, JsonEncoder, Level, Logger, SharedBuffer, TimeFormat};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

fn stubbed(buffer: &SharedBuffer) -> Logger {
    Logger::builder().output(buffer.clone()).stub_time().build()
}

// ============================================================================
// Logger Scenarios
// ============================================================================

#[test]
fn test_basic_scenario_with_child_context() {
    let buffer = SharedBuffer::new();
    let logger = stubbed(&buffer);

    logger.warn("Log without structured data...", &[]).unwrap();
    logger
        .warn(
            "Or use strongly-typed wrappers to add structured context.",
            &[
                Field::string("library", "zap"),
                Field::duration("latency", Duration::from_nanos(1)),
            ],
        )
        .unwrap();

    let child = logger.with(&[
        Field::string("user", "jane@test.com"),
        Field::int("visits", 42),
    ]);
    child.error("Oh no!", &[]).unwrap();

    assert_eq!(
        buffer.lines(),
        vec![
            r#"{"level":"warn","ts":0,"msg":"Log without structured data..."}"#,
            r#"{"level":"warn","ts":0,"msg":"Or use strongly-typed wrappers to add structured context.","library":"zap","latency":1}"#,
            r#"{"level":"error","ts":0,"msg":"Oh no!","user":"jane@test.com","visits":42}"#,
        ]
    );
}

#[test]
fn test_nested_field() {
    let buffer = SharedBuffer::new();
    let logger = stubbed(&buffer);

    let nest = Field::nest("outer", [Field::int("inner", 42)]);
    logger.info("Logging a nested field.", &[nest]).unwrap();

    assert_eq!(
        buffer.contents(),
        "{\"level\":\"info\",\"ts\":0,\"msg\":\"Logging a nested field.\",\"outer\":{\"inner\":42}}\n"
    );
}

#[test]
fn test_default_logger_skips_debug() {
    let buffer = SharedBuffer::new();
    let logger = stubbed(&buffer);

    logger.debug("This won't be printed.", &[]).unwrap();
    logger.info("This is an info log.", &[]).unwrap();

    assert_eq!(
        buffer.lines(),
        vec![r#"{"level":"info","ts":0,"msg":"This is an info log."}"#]
    );
}

#[test]
fn test_file_output() {
    let file = NamedTempFile::new().unwrap();
    let logger = Logger::builder()
        .output(file.reopen().unwrap())
        .stub_time()
        .build();

    logger
        .info("This is an info log.", &[Field::int("foo", 42)])
        .unwrap();
    logger.sync().unwrap();

    let contents = fs::read_to_string(file.path()).unwrap();
    assert_eq!(
        contents,
        "{\"level\":\"info\",\"ts\":0,\"msg\":\"This is an info log.\",\"foo\":42}\n"
    );
}

#[test]
fn test_checked_messages() {
    let buffer = SharedBuffer::new();
    let logger = stubbed(&buffer);

    let cm = logger.check(Level::Debug, "This is a debug log.");
    if cm.ok() {
        cm.write(&[Field::int("foo", 42), Field::stack()]).unwrap();
    }

    let cm = logger.check(Level::Info, "This is an info log.");
    if cm.ok() {
        cm.write(&[]).unwrap();
    }

    assert_eq!(
        buffer.lines(),
        vec![r#"{"level":"info","ts":0,"msg":"This is an info log."}"#]
    );
}

#[test]
fn test_production_encoder_options() {
    let buffer = SharedBuffer::new();
    let logger = Logger::builder()
        .output(buffer.clone())
        .stub_time()
        .encoder(
            JsonEncoder::builder()
                .time_key("@timestamp")
                .time_format(TimeFormat::Rfc3339)
                .message_key("@message")
                .level_key("@level")
                .build(),
        )
        .build();

    logger.error("aggregated", &[Field::bool("ok", false)]).unwrap();
    assert_eq!(
        buffer.lines(),
        vec![
            r#"{"@level":"error","@timestamp":"1970-01-01T00:00:00Z","@message":"aggregated","ok":false}"#
        ]
    );
}

// ============================================================================
// Level Serialization
// ============================================================================

#[derive(Serialize, Deserialize, Default)]
struct LevelHolder {
    level: Level,
}

#[test]
fn test_level_marshal() {
    let json = serde_json::to_string(&LevelHolder {
        level: Level::Error,
    })
    .unwrap();
    assert_eq!(json, r#"{"level":"error"}"#);
}

#[test]
fn test_level_unmarshal() {
    let mut holder = LevelHolder::default();
    assert_eq!(holder.level.to_string(), "info");

    holder = serde_json::from_str(r#"{"level":"error"}"#).unwrap();
    assert_eq!(holder.level.to_string(), "error");

    let failed = serde_json::from_str::<LevelHolder>(r#"{"level":"ERROR"}"#);
    assert!(failed.is_err());
    assert_eq!(holder.level, Level::Error);
}
