//! Error types for timing backends.

use thiserror::Error;

/// Errors a [`PerformanceBackend`](crate::PerformanceBackend) may report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// A measure referenced a mark that was never recorded
    #[error("Mark not found: {0}")]
    MissingMark(String),

    /// The backend cannot record anything right now
    #[error("Timing backend unavailable: {0}")]
    Unavailable(String),
}

/// Result type for timing backend operations.
pub type BackendResult<T> = Result<T, BackendError>;

#[cfg(test)]
mod tests {
    use super::*;
    use component_model::ComponentError;

    #[test]
    fn test_error_display() {
        let err = BackendError::MissingMark("A-1-start".to_string());
        assert_eq!(err.to_string(), "Mark not found: A-1-start");

        let err = BackendError::Unavailable("lock poisoned".to_string());
        assert_eq!(err.to_string(), "Timing backend unavailable: lock poisoned");
    }

    #[test]
    fn test_converts_into_component_error() {
        let err = ComponentError::instrumentation(BackendError::MissingMark("x".to_string()));
        assert_eq!(err.to_string(), "Instrumentation error: Mark not found: x");
    }
}
