//! Log feed scheduler: fetch one line, stamp it, hand it to the sink, wait,
//! repeat. The fetch-then-wait shape keeps at most one request in flight.

use std::time::Duration;

use crate::gemini;
use crate::model::SystemLog;

/// Source of terminal log lines. Implementations must always resolve; the
/// content provider converts its own failures into fallback text.
pub trait LogSource {
    async fn next_line(&self) -> String;
}

/// Gemini-backed source used by the app.
pub struct GeminiSource;

impl LogSource for GeminiSource {
    async fn next_line(&self) -> String {
        gemini::generate_log_line().await
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeedConfig {
    /// Pause between a completed fetch and the next one.
    pub delay: Duration,
}

impl Default for FeedConfig {
    fn default() -> Self {
        FeedConfig {
            delay: Duration::from_millis(3500),
        }
    }
}

/// Drive the feed until the sink declines an entry. Each iteration awaits
/// exactly one fetch, so two fetches can never overlap. In the app the loop
/// runs in a component-scoped task that is cancelled at the next await point
/// when the view unmounts; a sink returning `false` stops the loop for
/// callers managing their own lifetime.
pub async fn run_feed<S, F>(source: S, config: FeedConfig, mut on_entry: F)
where
    S: LogSource,
    F: FnMut(SystemLog) -> bool,
{
    loop {
        let message = source.next_line().await;
        if !on_entry(SystemLog::now(message)) {
            break;
        }
        tokio::time::sleep(config.delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct CountingSource {
        in_flight: Rc<Cell<usize>>,
        max_in_flight: Rc<Cell<usize>>,
        fetches: Rc<Cell<usize>>,
    }

    impl LogSource for CountingSource {
        async fn next_line(&self) -> String {
            let live = self.in_flight.get() + 1;
            self.in_flight.set(live);
            self.max_in_flight.set(self.max_in_flight.get().max(live));
            tokio::time::sleep(Duration::from_millis(2)).await;
            self.in_flight.set(self.in_flight.get() - 1);
            let n = self.fetches.get() + 1;
            self.fetches.set(n);
            format!("LINE_{n}")
        }
    }

    fn counting_source() -> (CountingSource, Rc<Cell<usize>>, Rc<Cell<usize>>) {
        let in_flight = Rc::new(Cell::new(0));
        let max_in_flight = Rc::new(Cell::new(0));
        let fetches = Rc::new(Cell::new(0));
        let source = CountingSource {
            in_flight,
            max_in_flight: max_in_flight.clone(),
            fetches: fetches.clone(),
        };
        (source, max_in_flight, fetches)
    }

    #[tokio::test]
    async fn fetches_never_overlap() {
        let (source, max_in_flight, fetches) = counting_source();
        let mut collected = Vec::new();
        run_feed(
            source,
            FeedConfig {
                delay: Duration::from_millis(1),
            },
            |entry| {
                collected.push(entry);
                collected.len() < 8
            },
        )
        .await;
        assert_eq!(max_in_flight.get(), 1);
        assert_eq!(fetches.get(), 8);
        assert_eq!(collected.len(), 8);
        assert_eq!(collected[0].message, "LINE_1");
        assert_eq!(collected[7].message, "LINE_8");
    }

    #[tokio::test]
    async fn stops_once_the_sink_declines() {
        let (source, _, fetches) = counting_source();
        run_feed(
            source,
            FeedConfig {
                delay: Duration::from_millis(1),
            },
            |_| false,
        )
        .await;
        assert_eq!(fetches.get(), 1);
    }

    #[tokio::test]
    async fn entries_carry_unique_ids_and_timestamps() {
        let (source, _, _) = counting_source();
        let mut collected = Vec::new();
        run_feed(
            source,
            FeedConfig {
                delay: Duration::from_millis(1),
            },
            |entry| {
                collected.push(entry);
                collected.len() < 3
            },
        )
        .await;
        assert_ne!(collected[0].id, collected[1].id);
        assert_ne!(collected[1].id, collected[2].id);
        for entry in &collected {
            assert_eq!(entry.timestamp.len(), "23:59:59".len());
        }
    }
}
