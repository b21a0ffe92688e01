//! In-app diagnostics buffer backing the SYS_DIAG panel (instead of
//! println/eprintln). Every push also emits a `tracing` event for anyone
//! running with a subscriber attached.

use std::collections::VecDeque;
use std::sync::{Mutex, OnceLock};

const MAX_ENTRIES: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Error,
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Info => "INFO",
            Level::Error => "ERROR",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiagEntry {
    pub time: String,
    pub level: Level,
    pub message: String,
}

/// Bounded diagnostics sink. The app uses the process-wide instance behind
/// [`app_log`]; tests construct their own.
#[derive(Debug, Default)]
pub struct DiagLog {
    entries: Mutex<VecDeque<DiagEntry>>,
}

impl DiagLog {
    pub fn new() -> Self {
        DiagLog::default()
    }

    /// Append an entry, trimming the oldest beyond capacity. Safe to call
    /// from any task.
    pub fn push(&self, level: Level, message: impl Into<String>) {
        let message = message.into();
        match level {
            Level::Info => tracing::info!("{message}"),
            Level::Error => tracing::error!("{message}"),
        }
        let entry = DiagEntry {
            time: chrono::Local::now().format("%H:%M:%S").to_string(),
            level,
            message,
        };
        if let Ok(mut entries) = self.entries.lock() {
            entries.push_back(entry);
            while entries.len() > MAX_ENTRIES {
                entries.pop_front();
            }
        }
    }

    /// Copy of the current entries for display.
    pub fn snapshot(&self) -> Vec<DiagEntry> {
        self.entries
            .lock()
            .map(|entries| entries.iter().cloned().collect())
            .unwrap_or_default()
    }
}

/// Process-wide sink used outside of tests.
pub fn diagnostics() -> &'static DiagLog {
    static DIAG: OnceLock<DiagLog> = OnceLock::new();
    DIAG.get_or_init(DiagLog::new)
}

pub fn app_log(level: Level, message: impl Into<String>) {
    diagnostics().push(level, message);
}

pub fn app_logs_snapshot() -> Vec<DiagEntry> {
    diagnostics().snapshot()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_oldest_beyond_capacity() {
        let diag = DiagLog::new();
        for i in 0..MAX_ENTRIES + 5 {
            diag.push(Level::Info, format!("entry {i}"));
        }
        let entries = diag.snapshot();
        assert_eq!(entries.len(), MAX_ENTRIES);
        assert_eq!(entries[0].message, "entry 5");
        assert_eq!(entries[MAX_ENTRIES - 1].message, format!("entry {}", MAX_ENTRIES + 4));
    }

    #[test]
    fn levels_render_for_display() {
        assert_eq!(Level::Info.as_str(), "INFO");
        assert_eq!(Level::Error.as_str(), "ERROR");
    }
}
