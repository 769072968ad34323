//! Instrumentation options and settings

use crate::backend::{PerformanceBackend, DEFAULT_MAX_TIMELINE_ENTRIES};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// What to do when the timing backend fails a `mark` or `measure`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BackendErrorPolicy {
    /// Log the failure and keep rendering; only timing data is lost.
    #[default]
    Isolate,
    /// Fail the lifecycle hook with `ComponentError::Instrumentation`.
    Propagate,
}

/// Serializable instrumentation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InstrumentSettings {
    /// When false the wrapper only delegates; no marks or measures are written.
    pub enabled: bool,

    /// Backend failure handling.
    pub on_backend_error: BackendErrorPolicy,

    /// Entry cap for the default [`Timeline`](crate::Timeline).
    ///
    /// Raised to [`MIN_TIMELINE_ENTRIES`](crate::MIN_TIMELINE_ENTRIES) when
    /// smaller. Ignored when a backend is supplied explicitly.
    pub max_timeline_entries: usize,
}

impl InstrumentSettings {
    /// Load settings from a JSON document. Missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl Default for InstrumentSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            on_backend_error: BackendErrorPolicy::Isolate,
            max_timeline_entries: DEFAULT_MAX_TIMELINE_ENTRIES,
        }
    }
}

/// Options bound when a component type is wrapped.
///
/// Leaving `performance` unset binds a fresh [`Timeline`](crate::Timeline)
/// at wrap time, reachable through
/// [`Instrumented::performance`](crate::Instrumented::performance).
#[derive(Clone, Default)]
pub struct InstrumentOptions {
    pub performance: Option<Arc<dyn PerformanceBackend>>,
    pub settings: InstrumentSettings,
}

impl InstrumentOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the given timing backend.
    pub fn with_performance<B>(mut self, backend: Arc<B>) -> Self
    where
        B: PerformanceBackend + 'static,
    {
        self.performance = Some(backend);
        self
    }

    pub fn with_settings(mut self, settings: InstrumentSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_error_policy(mut self, policy: BackendErrorPolicy) -> Self {
        self.settings.on_backend_error = policy;
        self
    }

    /// Enable or disable instrumentation.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.settings.enabled = enabled;
        self
    }
}

impl fmt::Debug for InstrumentOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstrumentOptions")
            .field("performance", &self.performance.as_ref().map(|_| ".."))
            .field("settings", &self.settings)
            .finish()
    }
}
