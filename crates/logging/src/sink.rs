// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! [`LogSink`]: an append-only, optionally size-rotated file writer.
//!
//! Rotation is checked *after* each write, never before: a write is never
//! held back pending a rotation decision, and a failed rotation leaves the
//! just-written bytes in place on the (now oversized) active file rather
//! than losing them.

use crate::error::LogSinkError;
use parking_lot::Mutex;
use servy_core::{Clock, SystemClock};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

struct State {
    file: Option<File>,
    size: u64,
    closed: bool,
}

/// An append-only log file with optional size-triggered rotation.
///
/// All writes, flushes, and rotations serialize through a single internal
/// lock, so a [`LogSink`] shared between a child's stdout and stderr pipes
/// (when both are configured to the same path) never interleaves partial
/// lines.
pub struct LogSink {
    path: PathBuf,
    rotation_size_bytes: u64,
    clock: Arc<dyn Clock>,
    state: Mutex<State>,
}

impl LogSink {
    /// Open (creating parent directories as needed) the log file at `path`.
    /// A `rotation_size_bytes` of `0` disables rotation entirely.
    pub fn open(path: impl Into<PathBuf>, rotation_size_bytes: u64) -> Result<Self, LogSinkError> {
        Self::open_with_clock(path, rotation_size_bytes, Arc::new(SystemClock))
    }

    /// As [`LogSink::open`], but with an injectable clock for deterministic
    /// rotation-filename tests.
    pub fn open_with_clock(
        path: impl Into<PathBuf>,
        rotation_size_bytes: u64,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, LogSinkError> {
        let path = path.into();
        let file = open_append(&path)?;
        let size = file
            .metadata()
            .map_err(|source| LogSinkError::Open {
                path: path.clone(),
                source,
            })?
            .len();

        Ok(LogSink {
            path,
            rotation_size_bytes,
            clock,
            state: Mutex::new(State {
                file: Some(file),
                size,
                closed: false,
            }),
        })
    }

    /// Write a single line, appending a trailing `\n` if `line` does not
    /// already end with one.
    pub fn write_line(&self, line: &str) -> Result<(), LogSinkError> {
        let mut buf = line.as_bytes().to_vec();
        if !line.ends_with('\n') {
            buf.push(b'\n');
        }
        self.write(&buf)
    }

    /// Write raw bytes, then rotate if the active file has reached the
    /// configured size threshold.
    pub fn write(&self, data: &[u8]) -> Result<(), LogSinkError> {
        let mut state = self.state.lock();
        if state.closed {
            return Ok(());
        }

        let file = state.file.as_mut().expect("open sink always has a file");
        file.write_all(data).map_err(|source| LogSinkError::Write {
            path: self.path.clone(),
            source,
        })?;
        file.flush().map_err(|source| LogSinkError::Write {
            path: self.path.clone(),
            source,
        })?;
        state.size += data.len() as u64;

        if self.rotation_size_bytes > 0 && state.size >= self.rotation_size_bytes {
            if let Err(err) = self.rotate(&mut state) {
                tracing::warn!(path = %self.path.display(), error = %err, "log rotation failed, continuing to append past the size threshold");
            }
        }

        Ok(())
    }

    pub fn flush(&self) -> Result<(), LogSinkError> {
        let mut state = self.state.lock();
        if let Some(file) = state.file.as_mut() {
            file.flush().map_err(|source| LogSinkError::Write {
                path: self.path.clone(),
                source,
            })?;
        }
        Ok(())
    }

    /// Flush and release the underlying file handle. Idempotent.
    pub fn close(&self) -> Result<(), LogSinkError> {
        let mut state = self.state.lock();
        if state.closed {
            return Ok(());
        }
        if let Some(file) = state.file.as_mut() {
            file.flush().map_err(|source| LogSinkError::Write {
                path: self.path.clone(),
                source,
            })?;
        }
        state.file = None;
        state.closed = true;
        Ok(())
    }

    fn rotate(&self, state: &mut State) -> Result<(), LogSinkError> {
        let timestamp = self.clock.now();
        let rotated_path = rotated_name(&self.path, timestamp);

        // Drop the handle before renaming so the rename sees a flushed file.
        state.file = None;
        std::fs::rename(&self.path, &rotated_path).map_err(|source| LogSinkError::Rotate {
            path: self.path.clone(),
            source,
        })?;

        let fresh = open_append(&self.path)?;
        state.file = Some(fresh);
        state.size = 0;
        Ok(())
    }
}

fn open_append(path: &Path) -> Result<File, LogSinkError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|source| LogSinkError::Open {
                path: path.to_path_buf(),
                source,
            })?;
        }
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| LogSinkError::Open {
            path: path.to_path_buf(),
            source,
        })
}

/// `<path>.<yyyyMMdd_HHmmss>`, with a `(1)`, `(2)`, ... suffix appended on
/// collision with an existing file.
fn rotated_name(path: &Path, since_epoch: std::time::Duration) -> PathBuf {
    let datetime = chrono::DateTime::<chrono::Utc>::from(
        std::time::UNIX_EPOCH + since_epoch,
    );
    let stamp = datetime.format("%Y%m%d_%H%M%S");
    let base = format!("{}.{}", path.display(), stamp);

    let mut candidate = PathBuf::from(&base);
    let mut suffix = 1;
    while candidate.exists() {
        candidate = PathBuf::from(format!("{base}({suffix})"));
        suffix += 1;
    }
    candidate
}

#[cfg(test)]
#[path = "sink_tests.rs"]
mod tests;
