//! Query counters and timing for a single tracker run
//!
//! Both live on the tracker instance rather than in process-wide statics, so independent
//! trackers (and tests) never see each other's numbers.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::future::Future;
use std::time::{Duration, Instant};

/// Counter name for the identity query
pub const USER_GETTER: &str = "user_getter";
/// Counter name for the repository count query
pub const GRAPH_REPOS_STARS: &str = "graph_repos_stars";

/// Invocation counts per API operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryCounter {
    counts: BTreeMap<String, u64>,
}

impl QueryCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counter pre-seeded with zero entries, so unused operations still show in summaries
    pub fn with_operations<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            counts: names.into_iter().map(|name| (name.into(), 0)).collect(),
        }
    }

    pub fn increment(&mut self, name: &str) {
        *self.counts.entry(name.to_string()).or_insert(0) += 1;
    }

    pub fn get(&self, name: &str) -> u64 {
        self.counts.get(name).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(name, count)| (name.as_str(), *count))
    }
}

/// One timed operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimedEntry {
    pub label: String,
    pub elapsed: Duration,
}

/// Ordered list of timed operations
#[derive(Debug, Clone, Default)]
pub struct PerformanceLog {
    entries: Vec<TimedEntry>,
}

impl PerformanceLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f`, record how long it took under `label`, and return its result
    pub fn track<T>(&mut self, label: impl Into<String>, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let value = f();
        self.record(label, start.elapsed());
        value
    }

    /// Await `fut`, record how long it took under `label`, and return its output
    pub async fn track_async<T, F>(&mut self, label: impl Into<String>, fut: F) -> T
    where
        F: Future<Output = T>,
    {
        let start = Instant::now();
        let value = fut.await;
        self.record(label, start.elapsed());
        value
    }

    pub fn record(&mut self, label: impl Into<String>, elapsed: Duration) {
        self.entries.push(TimedEntry {
            label: label.into(),
            elapsed,
        });
    }

    pub fn entries(&self) -> &[TimedEntry] {
        &self.entries
    }

    pub fn total(&self) -> Duration {
        self.entries.iter().map(|e| e.elapsed).sum()
    }
}

/// Elapsed time in seconds above one second, milliseconds otherwise
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs_f64();
    if secs > 1.0 {
        format!("{:>12.4} s", secs)
    } else {
        format!("{:>12.4} ms", secs * 1000.0)
    }
}

/// Human-readable timing and API call summary
pub fn render_summary(log: &PerformanceLog, counter: &QueryCounter) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Calculation times:");
    for entry in log.entries() {
        let _ = writeln!(
            out,
            "   {:<23}{}",
            format!("{}:", entry.label),
            format_elapsed(entry.elapsed)
        );
    }
    let _ = writeln!(
        out,
        "{:<21} {:>11.4} s",
        "Total function time:",
        log.total().as_secs_f64()
    );

    let _ = writeln!(out, "Total GitHub GraphQL API calls: {:>3}", counter.total());
    for (name, count) in counter.iter() {
        let _ = writeln!(out, "   {:<28} {:>6}", format!("{}:", name), count);
    }

    out
}
