//! Per-run log file.
//!
//! Every surfaced change and issue is appended here so an operator can audit
//! a run after the console output is gone.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Local;

/// Append-only log file for one run.
pub struct RunLog {
    /// Path to log file.
    log_path: PathBuf,
    /// File writer (buffered). `None` after `close()`.
    writer: Option<BufWriter<File>>,
    /// Prefix every line with a wall-clock timestamp.
    show_timestamps: bool,
}

impl RunLog {
    /// Create a new log file named after the current time inside `log_dir`.
    pub fn create(log_dir: impl AsRef<Path>, show_timestamps: bool) -> std::io::Result<Self> {
        let log_dir = log_dir.as_ref();
        fs::create_dir_all(log_dir)?;

        let log_path = log_dir.join(format!(
            "run_{}.log",
            Local::now().format("%Y%m%d_%H%M%S")
        ));
        let file = File::create(&log_path)?;

        Ok(Self {
            log_path,
            writer: Some(BufWriter::new(file)),
            show_timestamps,
        })
    }

    /// Get the log file path.
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Append one message. Write failures are ignored; the log is best-effort.
    pub fn line(&mut self, message: &str) {
        let formatted = if self.show_timestamps {
            format!("[{}] {}", Local::now().format("%H:%M:%S"), message)
        } else {
            message.to_string()
        };

        if let Some(writer) = self.writer.as_mut() {
            let _ = writeln!(writer, "{}", formatted);
        }
    }

    /// Flush the log file.
    pub fn flush(&mut self) {
        if let Some(writer) = self.writer.as_mut() {
            let _ = writer.flush();
        }
    }

    /// Close the logger and release the file.
    pub fn close(&mut self) {
        self.flush();
        self.writer = None;
    }
}

impl Drop for RunLog {
    fn drop(&mut self) {
        self.close();
    }
}
