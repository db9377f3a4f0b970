//! Terminal sink.
//!
//! Writes to stdout by default. Any `tracing_subscriber` [`MakeWriter`]
//! can stand in for it, so the same sink can target stderr or an in-memory
//! buffer.

use std::fmt;
use std::io::{self, Write};

use tracing_subscriber::fmt::MakeWriter;

use crate::logging::{Format, LogError, LogRecord, LogResult};
use crate::sinks::Sink;

/// Writes one rendered line per record to a terminal-like writer.
#[derive(Clone)]
pub struct ConsoleSink<W = fn() -> io::Stdout> {
    format: Format,
    make_writer: W,
}

impl ConsoleSink {
    pub fn new(format: Format) -> Self {
        Self {
            format,
            make_writer: io::stdout,
        }
    }
}

impl<W> ConsoleSink<W> {
    /// Send lines to `make_writer` instead of stdout.
    pub fn with_writer<W2>(self, make_writer: W2) -> ConsoleSink<W2>
    where
        W2: for<'a> MakeWriter<'a>,
    {
        ConsoleSink {
            format: self.format,
            make_writer,
        }
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new(Format::Plain)
    }
}

impl<W> fmt::Debug for ConsoleSink<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsoleSink")
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}

impl<W> Sink for ConsoleSink<W>
where
    W: for<'a> MakeWriter<'a> + Send + Sync,
{
    fn name(&self) -> &'static str {
        "console"
    }

    fn write(&self, record: &LogRecord) -> LogResult<()> {
        let mut line = self.format.render(record)?;
        line.push('\n');
        // One write call per line keeps output from concurrent threads whole.
        self.make_writer
            .make_writer()
            .write_all(line.as_bytes())
            .map_err(|e| LogError::io(self.name(), e))
    }
}

/// In-memory writer for capturing console output.
#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct TestWriter {
    buffer: std::sync::Arc<std::sync::Mutex<Vec<u8>>>,
}

#[cfg(test)]
impl TestWriter {
    pub(crate) fn output(&self) -> String {
        let buffer = self
            .buffer
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

#[cfg(test)]
impl Write for TestWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer
            .lock()
            .map_err(|_| io::Error::other("Mutex poisoned"))?
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
impl<'a> MakeWriter<'a> for TestWriter {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
