//! Run summary collection and output for the demo binary.
//!
//! Mirrors the shape of the session's accounting: what the writer offered and
//! what was actually admitted, what the reader delivered, and how much was
//! destroyed by overflow handling. Serialized as pretty JSON.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Aggregated outcome of one demo run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunSummary {
    /// Queue capacity in bytes.
    pub capacity: usize,
    /// Messages the writer attempted.
    pub messages_written: usize,
    /// Bytes the writer offered across all writes.
    pub bytes_offered: usize,
    /// Bytes the queue accepted (offered minus truncation and rejection).
    pub bytes_accepted: usize,
    /// Messages the reader delivered.
    pub messages_read: usize,
    /// Bytes the reader delivered.
    pub bytes_read: usize,
    /// Wall-clock duration of the run in milliseconds.
    pub elapsed_ms: u128,
}

impl RunSummary {
    /// Record one write attempt.
    pub fn record_write(&mut self, offered: usize, accepted: usize) {
        self.messages_written += 1;
        self.bytes_offered += offered;
        self.bytes_accepted += accepted;
    }

    /// Record one delivered message.
    pub fn record_read(&mut self, delivered: usize) {
        self.messages_read += 1;
        self.bytes_read += delivered;
    }

    /// Record the total run duration.
    pub fn set_elapsed(&mut self, elapsed: Duration) {
        self.elapsed_ms = elapsed.as_millis();
    }

    /// Bytes that were accepted but never delivered (destroyed by the
    /// clear-backlog policy, or still buffered at shutdown).
    pub fn bytes_unaccounted(&self) -> usize {
        self.bytes_accepted.saturating_sub(self.bytes_read)
    }

    /// Write the summary as pretty JSON to `path`.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Render the summary as pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_accumulates_counts() {
        let mut summary = RunSummary {
            capacity: 1024,
            ..RunSummary::default()
        };
        summary.record_write(100, 100);
        summary.record_write(100, 24);
        summary.record_read(100);

        assert_eq!(summary.messages_written, 2);
        assert_eq!(summary.bytes_offered, 200);
        assert_eq!(summary.bytes_accepted, 124);
        assert_eq!(summary.bytes_unaccounted(), 24);
    }

    #[test]
    fn test_summary_round_trips_through_json_file() {
        let mut summary = RunSummary::default();
        summary.record_write(8, 8);
        summary.set_elapsed(Duration::from_millis(42));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        summary.write_to_file(&path).unwrap();

        let parsed: RunSummary =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed.bytes_offered, 8);
        assert_eq!(parsed.elapsed_ms, 42);
    }
}
