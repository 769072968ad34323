//! Error types for component lifecycles.

use thiserror::Error;

/// Errors raised while mounting, updating or rendering a component.
#[derive(Debug, Error)]
pub enum ComponentError {
    /// The component's render function failed
    #[error("Render failed: {0}")]
    Render(String),

    /// A lifecycle hook failed
    #[error("Lifecycle hook `{hook}` failed: {message}")]
    Hook {
        /// Name of the hook, e.g. `did_mount`
        hook: &'static str,
        /// Failure description
        message: String,
    },

    /// A layer wrapped around the component (profiling, tracing) failed
    #[error("Instrumentation error: {0}")]
    Instrumentation(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ComponentError {
    /// Create a hook failure.
    pub fn hook(hook: &'static str, message: impl Into<String>) -> Self {
        Self::Hook {
            hook,
            message: message.into(),
        }
    }

    /// Wrap an error raised by an instrumentation layer.
    pub fn instrumentation<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Instrumentation(Box::new(err))
    }
}

/// Result type for component lifecycle operations.
pub type ComponentResult<T> = Result<T, ComponentError>;
