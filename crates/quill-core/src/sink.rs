//! Output sinks.
//!
//! A sink is anything that can take bytes and later be synced. Loggers share
//! one sink between a parent and all of its children, guarded by a mutex so
//! each encoded line reaches the sink in one piece.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::sync::Arc;

use parking_lot::Mutex;

/// A byte destination that can be flushed durably.
pub trait WriteSyncer: Write + Send {
    /// Push buffered data as far down as the target allows.
    fn sync(&mut self) -> io::Result<()>;
}

impl WriteSyncer for io::Stdout {
    fn sync(&mut self) -> io::Result<()> {
        self.flush()
    }
}

impl WriteSyncer for io::Stderr {
    fn sync(&mut self) -> io::Result<()> {
        self.flush()
    }
}

impl WriteSyncer for File {
    fn sync(&mut self) -> io::Result<()> {
        self.flush()?;
        self.sync_all()
    }
}

impl WriteSyncer for Vec<u8> {
    fn sync(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<W: WriteSyncer> WriteSyncer for BufWriter<W> {
    fn sync(&mut self) -> io::Result<()> {
        self.flush()?;
        self.get_mut().sync()
    }
}

/// Wraps a plain writer; syncing only flushes it.
#[derive(Debug)]
pub struct AddSync<W>(pub W);

impl<W: Write> Write for AddSync<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.write(buf)
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.0.write_all(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.flush()
    }
}

impl<W: Write + Send> WriteSyncer for AddSync<W> {
    fn sync(&mut self) -> io::Result<()> {
        self.0.flush()
    }
}

/// In-memory sink whose clones all see the same bytes.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    /// An empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.inner.lock()).into_owned()
    }

    /// Written lines without their trailing newlines.
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    /// Drop everything written so far.
    pub fn clear(&self) {
        self.inner.lock().clear();
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl WriteSyncer for SharedBuffer {
    fn sync(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// The sink handle held by a logger and all loggers derived from it.
#[derive(Clone)]
pub(crate) struct SharedSink(Arc<Mutex<Box<dyn WriteSyncer>>>);

impl SharedSink {
    pub(crate) fn new(sink: Box<dyn WriteSyncer>) -> Self {
        Self(Arc::new(Mutex::new(sink)))
    }

    pub(crate) fn sync(&self) -> io::Result<()> {
        self.0.lock().sync()
    }
}

/// Each call takes the lock once, so a single `write_all` is never torn by
/// writers on other threads.
impl Write for &SharedSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().write(buf)
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.0.lock().write_all(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.lock().flush()
    }
}
