//! In-memory capture sink.

use std::sync::{Arc, Mutex, PoisonError};

use crate::logging::{Format, LogRecord, LogResult};
use crate::sinks::Sink;

/// Keeps every record it receives, plus its rendered line.
///
/// Clones share the same buffer, so a test can keep one handle and install
/// another on a logger.
#[derive(Debug, Clone)]
pub struct MemorySink {
    format: Format,
    entries: Arc<Mutex<Vec<(LogRecord, String)>>>,
}

impl MemorySink {
    pub fn new(format: Format) -> Self {
        Self {
            format,
            entries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Records received so far, oldest first.
    pub fn records(&self) -> Vec<LogRecord> {
        self.lock().iter().map(|(record, _)| record.clone()).collect()
    }

    /// Rendered lines received so far, oldest first.
    pub fn lines(&self) -> Vec<String> {
        self.lock().iter().map(|(_, line)| line.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(LogRecord, String)>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new(Format::Json)
    }
}

impl Sink for MemorySink {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn write(&self, record: &LogRecord) -> LogResult<()> {
        let line = self.format.render(record)?;
        self.lock().push((record.clone(), line));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::Level;

    #[test]
    fn test_clones_share_buffer() {
        let sink = MemorySink::new(Format::Plain);
        let installed = sink.clone();

        installed
            .write(&LogRecord::new(Level::Info, "app", "one", crate::fields! {}))
            .unwrap();

        assert_eq!(sink.len(), 1);
        assert!(sink.lines()[0].ends_with("app - INFO - one"));

        sink.clear();
        assert!(installed.is_empty());
    }
}
