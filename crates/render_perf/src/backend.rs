//! Timing backends
//!
//! The instrumented component only ever writes to a backend through the two
//! primitives of [`PerformanceBackend`]. [`Timeline`] is the default binding:
//! an in-process recorder shaped like a browser performance timeline.

use crate::error::{BackendError, BackendResult};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Default cap on the number of entries a [`Timeline`] keeps.
pub const DEFAULT_MAX_TIMELINE_ENTRIES: usize = 10_000;

/// Minimal timing interface the instrumentation requires.
pub trait PerformanceBackend: Send + Sync {
    /// Record a timestamp under `label`.
    fn mark(&self, label: &str) -> BackendResult<()>;

    /// Record the duration between two previously recorded marks under `label`.
    fn measure(&self, label: &str, start_label: &str, end_label: &str) -> BackendResult<()>;
}

impl<B: PerformanceBackend + ?Sized> PerformanceBackend for Arc<B> {
    fn mark(&self, label: &str) -> BackendResult<()> {
        (**self).mark(label)
    }

    fn measure(&self, label: &str, start_label: &str, end_label: &str) -> BackendResult<()> {
        (**self).measure(label, start_label, end_label)
    }
}

/// A recorded timeline entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "entryType", rename_all = "camelCase")]
pub enum TimelineEntry {
    /// A named timestamp, relative to the timeline origin
    #[serde(rename_all = "camelCase")]
    Mark { name: String, start_time: Duration },
    /// A named duration between two marks
    #[serde(rename_all = "camelCase")]
    Measure {
        name: String,
        start_mark: String,
        end_mark: String,
        start_time: Duration,
        duration: Duration,
    },
}

impl TimelineEntry {
    /// Name the entry was recorded under.
    pub fn name(&self) -> &str {
        match self {
            TimelineEntry::Mark { name, .. } => name,
            TimelineEntry::Measure { name, .. } => name,
        }
    }

    pub fn is_mark(&self) -> bool {
        matches!(self, TimelineEntry::Mark { .. })
    }

    pub fn is_measure(&self) -> bool {
        matches!(self, TimelineEntry::Measure { .. })
    }
}

#[derive(Debug, Default)]
struct TimelineState {
    marks: HashMap<String, Duration>,
    entries: VecDeque<TimelineEntry>,
}

/// In-process performance timeline.
///
/// Marks are stamped against a monotonic origin taken at construction.
/// Entries are kept in recording order; once `max_entries` is reached the
/// oldest entry is evicted, and an evicted mark can no longer be measured.
/// A cap below 3 therefore evicts a start mark before its measure is written.
#[derive(Debug)]
pub struct Timeline {
    origin: Instant,
    time_origin: chrono::DateTime<chrono::Utc>,
    max_entries: usize,
    state: Mutex<TimelineState>,
}

impl Timeline {
    /// Create an empty timeline with the default entry cap.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            time_origin: chrono::Utc::now(),
            max_entries: DEFAULT_MAX_TIMELINE_ENTRIES,
            state: Mutex::new(TimelineState::default()),
        }
    }

    /// Set the maximum number of entries to keep (at least 1).
    pub fn with_max_entries(mut self, max: usize) -> Self {
        self.max_entries = max.max(1);
        self
    }

    /// Wall-clock time the timeline started.
    pub fn time_origin(&self) -> chrono::DateTime<chrono::Utc> {
        self.time_origin
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    fn lock(&self) -> BackendResult<MutexGuard<'_, TimelineState>> {
        self.state
            .lock()
            .map_err(|_| BackendError::Unavailable("timeline lock poisoned".to_string()))
    }

    fn push(&self, state: &mut TimelineState, entry: TimelineEntry) {
        while state.entries.len() >= self.max_entries {
            if let Some(TimelineEntry::Mark { name, start_time }) = state.entries.pop_front() {
                // The label may since have been marked again.
                if state.marks.get(&name) == Some(&start_time) {
                    state.marks.remove(&name);
                }
            }
        }
        state.entries.push_back(entry);
    }

    /// All entries in recording order.
    pub fn entries(&self) -> Vec<TimelineEntry> {
        match self.state.lock() {
            Ok(state) => state.entries.iter().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Mark entries in recording order.
    pub fn marks(&self) -> Vec<TimelineEntry> {
        self.entries().into_iter().filter(TimelineEntry::is_mark).collect()
    }

    /// Measure entries in recording order.
    pub fn measures(&self) -> Vec<TimelineEntry> {
        self.entries()
            .into_iter()
            .filter(TimelineEntry::is_measure)
            .collect()
    }

    /// Measure entries recorded under `name`.
    pub fn measures_named(&self, name: &str) -> Vec<TimelineEntry> {
        self.measures()
            .into_iter()
            .filter(|entry| entry.name() == name)
            .collect()
    }

    /// Drop every mark and entry.
    pub fn clear(&self) {
        if let Ok(mut state) = self.state.lock() {
            state.marks.clear();
            state.entries.clear();
        }
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}

impl PerformanceBackend for Timeline {
    fn mark(&self, label: &str) -> BackendResult<()> {
        let start_time = self.origin.elapsed();
        let mut state = self.lock()?;
        state.marks.insert(label.to_string(), start_time);
        self.push(
            &mut state,
            TimelineEntry::Mark {
                name: label.to_string(),
                start_time,
            },
        );
        Ok(())
    }

    fn measure(&self, label: &str, start_label: &str, end_label: &str) -> BackendResult<()> {
        let mut state = self.lock()?;
        let start = *state
            .marks
            .get(start_label)
            .ok_or_else(|| BackendError::MissingMark(start_label.to_string()))?;
        let end = *state
            .marks
            .get(end_label)
            .ok_or_else(|| BackendError::MissingMark(end_label.to_string()))?;
        let duration = end.saturating_sub(start);

        tracing::trace!(
            target: "render_perf",
            name = label,
            duration_ms = duration.as_secs_f64() * 1000.0,
            "measure recorded"
        );

        self.push(
            &mut state,
            TimelineEntry::Measure {
                name: label.to_string(),
                start_mark: start_label.to_string(),
                end_mark: end_label.to_string(),
                start_time: start,
                duration,
            },
        );
        Ok(())
    }
}
