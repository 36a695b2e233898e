//! Published host state and the types observers see.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Maximum number of retained log entries per host.
pub const LOG_CAPACITY: usize = 50;

/// Latency shown while no result is available.
pub const LATENCY_UNKNOWN: &str = "-";
/// Latency shown when the host did not answer.
pub const LATENCY_TIMEOUT: &str = "timeout";
/// Latency shown when the probe could not be launched.
pub const LATENCY_ERROR: &str = "err";

/// Health of a monitored host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostStatus {
    Idle,
    Pinging,
    Up,
    Down,
    Error,
}

/// One line of a host's bounded history log.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub message: String,
    pub is_success: bool,
}

impl LogEntry {
    fn new(message: String, is_success: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            message,
            is_success,
        }
    }

    /// Wall-clock time of the entry, for display.
    pub fn time_string(&self) -> String {
        self.timestamp.format("%H:%M:%S").to_string()
    }
}

/// Mutable published state of one host. All access goes through the
/// owning monitor's lock; observers get [`HostSnapshot`] copies.
#[derive(Debug)]
pub struct HostState {
    pub hostname: String,
    pub label: String,
    pub status: HostStatus,
    pub latency: String,
    pub success_count: u64,
    pub failure_count: u64,
    pub log: VecDeque<LogEntry>,
    pub is_running: bool,
    /// Status the last completion was compared against. Distinct from
    /// `status` so a result can be judged against the pre-update value.
    pub previous_status: HostStatus,
}

impl HostState {
    pub fn new(hostname: &str, label: &str) -> Self {
        Self {
            hostname: hostname.to_string(),
            label: effective_label(hostname, label),
            status: HostStatus::Idle,
            latency: LATENCY_UNKNOWN.to_string(),
            success_count: 0,
            failure_count: 0,
            log: VecDeque::with_capacity(LOG_CAPACITY),
            is_running: false,
            previous_status: HostStatus::Idle,
        }
    }

    /// Prepend a log entry, evicting the oldest past [`LOG_CAPACITY`].
    pub fn push_log(&mut self, message: String, is_success: bool) {
        self.log.push_front(LogEntry::new(message, is_success));
        self.log.truncate(LOG_CAPACITY);
    }

    /// Zero the counters and drop the log.
    pub fn clear_stats(&mut self) {
        self.log.clear();
        self.success_count = 0;
        self.failure_count = 0;
    }
}

/// A blank label falls back to the hostname.
pub fn effective_label(hostname: &str, label: &str) -> String {
    let label = label.trim();
    if label.is_empty() {
        hostname.to_string()
    } else {
        label.to_string()
    }
}

/// Point-in-time copy of a host's published state.
#[derive(Debug, Clone)]
pub struct HostSnapshot {
    pub id: Uuid,
    pub hostname: String,
    pub label: String,
    pub status: HostStatus,
    pub latency: String,
    pub success_count: u64,
    pub failure_count: u64,
    pub is_running: bool,
    pub log: Vec<LogEntry>,
}

/// Emitted when a host flips between reachable and unreachable.
/// Delivery (notification, webhook, log line) is the consumer's concern.
#[derive(Debug, Clone)]
pub struct TransitionEvent {
    pub host_id: Uuid,
    pub hostname: String,
    pub label: String,
    pub new_status: HostStatus,
    pub timestamp: DateTime<Utc>,
}
