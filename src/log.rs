//! Append-only result log
//!
//! Remoting test runs record one timestamped line per dispatched call so a
//! harness can compare what the gateway saw with what the client sent.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::Result;

/// Timestamped text sink opened in append mode
#[derive(Debug)]
pub struct ResultLog {
    path: PathBuf,
    file: Mutex<File>,
}

impl ResultLog {
    /// Open (or create) the log file for appending
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append entries stamped with the current time
    ///
    /// Blocking; async callers run this on the blocking pool.
    pub fn append<S: AsRef<str>>(&self, entries: &[S]) -> Result<()> {
        self.append_at(SystemTime::now(), entries)
    }

    /// Append entries stamped with `at` in a single write
    pub fn append_at<S: AsRef<str>>(&self, at: SystemTime, entries: &[S]) -> Result<()> {
        if entries.is_empty() {
            return Ok(());
        }
        let text: String = entries
            .iter()
            .map(|entry| format_entry(at, entry.as_ref()))
            .collect();
        let mut file = self.file.lock().unwrap_or_else(|e| e.into_inner());
        file.write_all(text.as_bytes())?;
        Ok(())
    }
}

/// Format a log line: `[<unix seconds>.<millis>] <text>\n`
pub fn format_entry(at: SystemTime, text: &str) -> String {
    let since = at.duration_since(UNIX_EPOCH).unwrap_or_default();
    format!(
        "[{}.{:03}] {}\n",
        since.as_secs(),
        since.subsec_millis(),
        text.trim_end_matches('\n')
    )
}
