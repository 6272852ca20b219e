//! Time sources for entry timestamps.

use chrono::{DateTime, Utc};

/// Supplies the timestamp of each entry at write time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time, read fresh on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at a fixed instant, for deterministic output in tests.
#[derive(Debug, Clone, Copy)]
pub struct StubClock(pub DateTime<Utc>);

impl StubClock {
    /// Frozen at the Unix epoch, so `ts` renders as `0`.
    pub fn epoch() -> Self {
        Self(DateTime::<Utc>::UNIX_EPOCH)
    }
}

impl Clock for StubClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
