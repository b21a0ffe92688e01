//! Countdown math for the retro screen. The target is captured once and every
//! tick is a pure function of the clock, so the loop stays trivially testable.

use chrono::{NaiveDateTime, NaiveTime};

/// One evaluated tick of the countdown.
#[derive(Debug, Clone, PartialEq)]
pub struct CountdownTick {
    /// Zero-padded `HH:MM:SS`; hours are not capped at 24.
    pub display: String,
    /// Local date as `YYYY-MM-DD`.
    pub date: String,
    /// Set when the target has been reached (or was already past at start).
    pub reached: bool,
}

/// Countdown to a fixed target instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Countdown {
    target: NaiveDateTime,
}

impl Countdown {
    /// Target the start of the next calendar day after `now`.
    pub fn until_next_midnight(now: NaiveDateTime) -> Self {
        let next_day = now.date().succ_opt().unwrap_or(now.date());
        Countdown {
            target: next_day.and_time(NaiveTime::MIN),
        }
    }

    /// Evaluate the countdown at `now`. Remaining time is rounded up to whole
    /// seconds, so the display runs `00:00:02 -> 00:00:01 -> reached` without
    /// ever showing a premature zero or a negative value.
    pub fn tick(&self, now: NaiveDateTime) -> CountdownTick {
        let remaining_ms = (self.target - now).num_milliseconds();
        let reached = remaining_ms <= 0;
        let display = if reached {
            "00:00:00".to_string()
        } else {
            format_remaining((remaining_ms + 999) / 1000)
        };
        CountdownTick {
            display,
            date: now.format("%Y-%m-%d").to_string(),
            reached,
        }
    }
}

fn format_remaining(total_secs: i64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}
