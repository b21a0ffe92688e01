//! Shared domain types (used by the UI, the feed loop and the content provider).

use std::collections::VecDeque;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How long the glitch interlude holds before the celebration takes over.
pub const GLITCH_DWELL: Duration = Duration::from_secs(4);

/// Visible history of the terminal log feed.
pub const LOG_CAPACITY: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Retro,
    Glitch,
    Modern,
}

impl AppMode {
    /// Midnight signal, from the countdown or the manual override. Only the
    /// retro screen reacts; a re-delivered signal is a no-op.
    pub fn on_midnight_signal(self) -> Self {
        match self {
            AppMode::Retro => AppMode::Glitch,
            other => other,
        }
    }

    /// Dwell timer expiry. Only meaningful while glitching.
    pub fn after_glitch_dwell(self) -> Self {
        match self {
            AppMode::Glitch => AppMode::Modern,
            other => other,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SystemLog {
    pub id: String,
    pub timestamp: String,
    pub message: String,
}

impl SystemLog {
    /// Stamp a freshly fetched line with the current wall clock.
    pub fn now(message: String) -> Self {
        SystemLog {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: chrono::Local::now().format("%H:%M:%S").to_string(),
            message,
        }
    }
}

/// Identity card shown on the celebration screen. Parsed from provider JSON,
/// so `element` tolerates being absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub title: String,
    pub mission: String,
    #[serde(default)]
    pub element: Option<String>,
}

/// Bounded FIFO of terminal log lines. Pushing beyond [`LOG_CAPACITY`]
/// evicts the oldest entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogBuffer {
    entries: VecDeque<SystemLog>,
}

impl LogBuffer {
    pub fn new() -> Self {
        LogBuffer {
            entries: VecDeque::with_capacity(LOG_CAPACITY),
        }
    }

    pub fn push(&mut self, entry: SystemLog) {
        self.entries.push_back(entry);
        while self.entries.len() > LOG_CAPACITY {
            self.entries.pop_front();
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &SystemLog> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(message: &str) -> SystemLog {
        SystemLog {
            id: message.to_string(),
            timestamp: "23:59:59".to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn buffer_never_exceeds_capacity() {
        let mut buffer = LogBuffer::new();
        for i in 0..20 {
            buffer.push(entry(&format!("line {i}")));
            assert!(buffer.len() <= LOG_CAPACITY);
        }
        assert_eq!(buffer.len(), LOG_CAPACITY);
    }

    #[test]
    fn buffer_evicts_oldest_first() {
        let mut buffer = LogBuffer::new();
        for i in 1..=8 {
            buffer.push(entry(&format!("line {i}")));
        }
        let messages: Vec<&str> = buffer.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(
            messages,
            ["line 2", "line 3", "line 4", "line 5", "line 6", "line 7", "line 8"]
        );
        assert!(!messages.contains(&"line 1"));
    }

    #[test]
    fn buffer_preserves_insertion_order() {
        let mut buffer = LogBuffer::new();
        buffer.push(entry("a"));
        buffer.push(entry("b"));
        buffer.push(entry("c"));
        let messages: Vec<&str> = buffer.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, ["a", "b", "c"]);
    }

    #[test]
    fn mode_advances_linearly() {
        let mode = AppMode::Retro.on_midnight_signal();
        assert_eq!(mode, AppMode::Glitch);
        assert_eq!(mode.after_glitch_dwell(), AppMode::Modern);
    }

    #[test]
    fn midnight_signal_is_noop_outside_retro() {
        assert_eq!(AppMode::Glitch.on_midnight_signal(), AppMode::Glitch);
        assert_eq!(AppMode::Modern.on_midnight_signal(), AppMode::Modern);
    }

    #[test]
    fn dwell_expiry_is_noop_outside_glitch() {
        assert_eq!(AppMode::Retro.after_glitch_dwell(), AppMode::Retro);
        assert_eq!(AppMode::Modern.after_glitch_dwell(), AppMode::Modern);
    }
}
