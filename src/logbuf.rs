//! Bounded in-memory log of recent service activity
//!
//! Every entry is mirrored to `tracing` and kept in a fixed-capacity deque.
//! When an append would exceed the capacity the oldest entry is dropped.
//! A separate counter tracks how many entries were ever recorded.
//!
//! # Example
//!
//! ```rust
//! use charge_alert::logbuf::LogBuffer;
//!
//! let logs = LogBuffer::new();
//! logs.record("Webhook received: charge.failed");
//!
//! assert_eq!(logs.total(), 1);
//! assert!(logs.recent(20)[0].as_str().ends_with("charge.failed"));
//! ```

use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{SecondsFormat, Utc};
use parking_lot::Mutex;
use serde::Serialize;

/// Number of entries retained by default
pub const DEFAULT_LOG_CAPACITY: usize = 50;

/// A single timestamp-prefixed log line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LogEntry(String);

impl LogEntry {
    fn now(message: &str) -> Self {
        let ts = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        Self(format!("[{ts}] {message}"))
    }

    /// The full line, including its timestamp prefix
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Thread-safe ring buffer of log entries
#[derive(Debug)]
pub struct LogBuffer {
    entries: Mutex<VecDeque<LogEntry>>,
    capacity: usize,
    /// Entries ever recorded (not capped by `capacity`)
    total: AtomicU64,
}

impl LogBuffer {
    /// Create a buffer holding the last [`DEFAULT_LOG_CAPACITY`] entries
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_LOG_CAPACITY)
    }

    /// Create a buffer with a custom capacity (minimum 1)
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Mutex::new(VecDeque::with_capacity(capacity + 1)),
            capacity,
            total: AtomicU64::new(0),
        }
    }

    /// Append a message, evicting the oldest entries past capacity.
    pub fn record(&self, message: impl AsRef<str>) {
        let message = message.as_ref();
        tracing::info!(target: "charge_alert::activity", "{message}");

        let entry = LogEntry::now(message);
        let mut entries = self.entries.lock();
        entries.push_back(entry);
        while entries.len() > self.capacity {
            entries.pop_front();
        }
        self.total.fetch_add(1, Ordering::Relaxed);
    }

    /// The last `n` entries, oldest first
    pub fn recent(&self, n: usize) -> Vec<LogEntry> {
        let entries = self.entries.lock();
        let skip = entries.len().saturating_sub(n);
        entries.iter().skip(skip).cloned().collect()
    }

    /// Number of entries ever recorded
    #[inline]
    pub fn total(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }

    /// Number of entries currently retained
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether nothing is retained
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Maximum number of retained entries
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn message_of(entry: &LogEntry) -> &str {
        entry
            .as_str()
            .split_once("] ")
            .map(|(_, msg)| msg)
            .unwrap()
    }

    #[test]
    fn test_entry_has_timestamp_prefix() {
        let logs = LogBuffer::new();
        logs.record("hello");

        let entry = &logs.recent(1)[0];
        assert!(entry.as_str().starts_with('['));
        assert!(entry.as_str().contains("Z] "));
        assert_eq!(message_of(entry), "hello");
    }

    #[test]
    fn test_evicts_oldest_past_capacity() {
        let logs = LogBuffer::new();
        for i in 0..51 {
            logs.record(format!("entry {i}"));
        }

        assert_eq!(logs.len(), 50);
        let all = logs.recent(50);
        assert_eq!(message_of(&all[0]), "entry 1");
        assert_eq!(message_of(&all[49]), "entry 50");
    }

    #[test]
    fn test_recent_returns_most_recent_last() {
        let logs = LogBuffer::with_capacity(5);
        for i in 0..4 {
            logs.record(format!("entry {i}"));
        }

        let last_two: Vec<_> = logs.recent(2).iter().map(|e| message_of(e).to_string()).collect();
        assert_eq!(last_two, vec!["entry 2", "entry 3"]);
        assert_eq!(logs.recent(20).len(), 4);
        assert!(logs.recent(0).is_empty());
    }

    #[test]
    fn test_total_exceeds_capacity() {
        let logs = LogBuffer::with_capacity(3);
        for _ in 0..10 {
            logs.record("x");
        }
        assert_eq!(logs.len(), 3);
        assert_eq!(logs.total(), 10);
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let logs = LogBuffer::with_capacity(0);
        logs.record("a");
        logs.record("b");
        assert_eq!(logs.capacity(), 1);
        assert_eq!(message_of(&logs.recent(5)[0]), "b");
    }

    #[test]
    fn test_entry_serializes_as_string() {
        let logs = LogBuffer::new();
        logs.record("serialized");
        let json = serde_json::to_value(logs.recent(1)).unwrap();
        assert!(json[0].as_str().unwrap().ends_with("serialized"));
    }

    #[test]
    fn test_concurrent_records() {
        use std::thread;

        let logs = Arc::new(LogBuffer::new());
        let mut handles = vec![];

        for t in 0..8 {
            let logs = Arc::clone(&logs);
            handles.push(thread::spawn(move || {
                for i in 0..100 {
                    logs.record(format!("thread {t} entry {i}"));
                }
            }));
        }

        for handle in handles {
            handle.join().expect("Thread panicked");
        }

        assert_eq!(logs.total(), 800);
        assert_eq!(logs.len(), DEFAULT_LOG_CAPACITY);
    }
}
