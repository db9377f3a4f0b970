//! Size-based rotating file sink.
//!
//! # Rotation
//! ```text
//! before writing a line of n bytes:
//!     active file non-empty and size + n > max_bytes?
//!         → delete <file>.N
//!         → rename <file>.i to <file>.(i+1), for i = N-1 .. 1
//!         → rename <file> to <file>.1
//!         → open a fresh <file>
//! ```
//!
//! # Design Decisions
//! - `max_bytes == 0` disables rotation
//! - `backup_count == 0` truncates the active file instead of keeping backups
//! - A single line larger than `max_bytes` still lands whole in a fresh file
//! - All state sits behind one mutex; rotation and writes never interleave

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::logging::{Format, LogError, LogRecord, LogResult};
use crate::observability::metrics;
use crate::sinks::Sink;

#[derive(Debug)]
struct ActiveFile {
    /// `None` after a failed rotation; reopened on the next write.
    file: Option<File>,
    size: u64,
}

/// Appends rendered records to a file, rolling it over by size.
#[derive(Debug)]
pub struct RotatingFileSink {
    path: PathBuf,
    format: Format,
    max_bytes: u64,
    backup_count: usize,
    active: Mutex<ActiveFile>,
}

impl RotatingFileSink {
    /// Open (or create) `path` for appending.
    pub fn open(
        path: impl Into<PathBuf>,
        format: Format,
        max_bytes: u64,
        backup_count: usize,
    ) -> io::Result<Self> {
        let path = path.into();
        let file = open_append(&path)?;
        let size = file.metadata()?.len();

        Ok(Self {
            path,
            format,
            max_bytes,
            backup_count,
            active: Mutex::new(ActiveFile {
                file: Some(file),
                size,
            }),
        })
    }

    /// Path of the active file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the backup with the given index (1 is the newest).
    pub fn backup_path(&self, index: usize) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(format!(".{}", index));
        PathBuf::from(name)
    }

    /// Bytes currently in the active file, as tracked by the sink.
    pub fn current_size(&self) -> u64 {
        self.active.lock().unwrap_or_else(PoisonError::into_inner).size
    }

    fn should_rotate(&self, size: u64, incoming: u64) -> bool {
        self.max_bytes > 0 && size > 0 && size.saturating_add(incoming) > self.max_bytes
    }

    fn rotate(&self, active: &mut ActiveFile) -> io::Result<()> {
        if let Some(mut file) = active.file.take() {
            file.flush()?;
        }

        if self.backup_count == 0 {
            let file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&self.path)?;
            active.file = Some(file);
            active.size = 0;
            return Ok(());
        }

        let oldest = self.backup_path(self.backup_count);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }
        for index in (1..self.backup_count).rev() {
            let from = self.backup_path(index);
            if from.exists() {
                fs::rename(&from, self.backup_path(index + 1))?;
            }
        }
        if self.path.exists() {
            fs::rename(&self.path, self.backup_path(1))?;
        }

        active.file = Some(open_append(&self.path)?);
        active.size = 0;

        metrics::record_rotation(&self.path);
        tracing::debug!(
            path = %self.path.display(),
            backups = self.backup_count,
            "Rotated log file"
        );
        Ok(())
    }

    fn write_line(&self, line: &str) -> io::Result<()> {
        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        let incoming = line.len() as u64;

        if self.should_rotate(active.size, incoming) {
            self.rotate(&mut active)?;
        }

        if active.file.is_none() {
            let file = open_append(&self.path)?;
            active.size = file.metadata()?.len();
            active.file = Some(file);
        }
        if let Some(file) = active.file.as_mut() {
            file.write_all(line.as_bytes())?;
        }
        active.size += incoming;
        Ok(())
    }
}

impl Sink for RotatingFileSink {
    fn name(&self) -> &'static str {
        "file"
    }

    fn write(&self, record: &LogRecord) -> LogResult<()> {
        let mut line = self.format.render(record)?;
        line.push('\n');
        self.write_line(&line).map_err(|e| LogError::io(self.name(), e))
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}
