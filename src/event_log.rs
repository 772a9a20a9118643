//! Append-only JSON-lines event log.
//!
//! Every call to [`EventLog::append`] writes exactly one self-contained JSON
//! object on its own line: `{"timestamp", "level", "message"}`. The file is
//! never rotated or trimmed by this system; [`EventLog::tail`] simply reads
//! the most recent lines from the raw file. Concurrent writers rely on the
//! platform's append-mode atomicity for short writes — no lock is taken.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// One structured log line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    /// RFC 3339 timestamp, set at append time.
    pub timestamp: String,
    /// Severity tag, upper-cased on write (`INFO`, `SUCCESS`, `ERROR`, ...).
    pub level: String,
    /// Free-text message.
    pub message: String,
}

/// Handle to the JSON-lines event log file.
///
/// Cheap to clone around via `Arc`; holds no open file descriptor — each
/// append opens the file in append mode and writes one line.
#[derive(Debug)]
pub struct EventLog {
    path: PathBuf,
}

impl EventLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one event line. The level tag is normalized to upper case.
    ///
    /// Write failures propagate to the caller; nothing is caught here.
    pub fn append(&self, level: &str, message: &str) -> Result<()> {
        let record = EventRecord {
            timestamp: chrono::Utc::now().to_rfc3339(),
            level: level.to_uppercase(),
            message: message.to_string(),
        };
        let mut line = serde_json::to_string(&record).context("failed to serialize event")?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("failed to open event log at {}", self.path.display()))?;
        file.write_all(line.as_bytes())
            .with_context(|| format!("failed to append to {}", self.path.display()))?;
        Ok(())
    }

    /// Return the last `max` raw lines, oldest-to-newest within that window.
    ///
    /// Returns `None` if the log file has never been created.
    pub fn tail(&self, max: usize) -> Result<Option<Vec<String>>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read event log at {}", self.path.display()))?;
        let lines: Vec<&str> = contents.lines().collect();
        let start = lines.len().saturating_sub(max);
        Ok(Some(lines[start..].iter().map(|s| s.to_string()).collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_log() -> (tempfile::TempDir, EventLog) {
        let dir = tempfile::tempdir().unwrap();
        let log = EventLog::new(dir.path().join("events.jsonl"));
        (dir, log)
    }

    #[test]
    fn append_writes_one_parseable_json_line() {
        let (_dir, log) = test_log();
        log.append("info", "hello").unwrap();

        let contents = std::fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 1);

        let record: EventRecord = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(record.level, "INFO");
        assert_eq!(record.message, "hello");
        assert!(!record.timestamp.is_empty());
    }

    #[test]
    fn level_is_upper_cased() {
        let (_dir, log) = test_log();
        log.append("success", "done").unwrap();
        log.append("Error", "oops").unwrap();

        let lines = log.tail(10).unwrap().unwrap();
        let first: EventRecord = serde_json::from_str(&lines[0]).unwrap();
        let second: EventRecord = serde_json::from_str(&lines[1]).unwrap();
        assert_eq!(first.level, "SUCCESS");
        assert_eq!(second.level, "ERROR");
    }

    #[test]
    fn tail_of_missing_file_is_none() {
        let (_dir, log) = test_log();
        assert!(log.tail(100).unwrap().is_none());
    }

    #[test]
    fn tail_returns_last_lines_oldest_to_newest() {
        let (_dir, log) = test_log();
        for i in 0..150 {
            log.append("INFO", &format!("line {i}")).unwrap();
        }

        let lines = log.tail(100).unwrap().unwrap();
        assert_eq!(lines.len(), 100);

        let first: EventRecord = serde_json::from_str(&lines[0]).unwrap();
        let last: EventRecord = serde_json::from_str(&lines[99]).unwrap();
        assert_eq!(first.message, "line 50");
        assert_eq!(last.message, "line 149");
    }

    #[test]
    fn tail_smaller_than_limit_returns_everything() {
        let (_dir, log) = test_log();
        log.append("INFO", "only line").unwrap();

        let lines = log.tail(100).unwrap().unwrap();
        assert_eq!(lines.len(), 1);
    }
}
