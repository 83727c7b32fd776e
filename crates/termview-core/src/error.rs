//! Error types for the termview server.

use thiserror::Error;

use crate::SessionId;

/// Main error type for termview operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Unknown session id passed to a per-session operation
    #[error("Session not found: {0}")]
    SessionNotFound(SessionId),

    /// Operation requires a spawned PTY but none exists yet
    #[error("Session has no process: call spawn first")]
    NotSpawned,

    /// The PTY spawner could not start the requested process
    #[error("Spawn failure: {0}")]
    SpawnFailure(String),

    /// No usable PTY-spawning capability in this environment
    #[error("PTY backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Session limit reached
    #[error("Session limit reached (max: {0})")]
    SessionLimitReached(usize),

    /// Invalid terminal dimensions
    #[error("Invalid dimensions: {rows}x{cols}")]
    InvalidDimensions {
        /// Number of rows
        rows: u16,
        /// Number of columns
        cols: u16,
    },

    /// Image encoding failed
    #[error("Render error: {0}")]
    Render(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error with custom message
    #[error("{0}")]
    Other(String),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_not_found_error() {
        let err = Error::SessionNotFound(SessionId::from("sess-7".to_string()));
        assert_eq!(err.to_string(), "Session not found: sess-7");
    }

    #[test]
    fn test_not_spawned_error() {
        let err = Error::NotSpawned;
        assert!(err.to_string().contains("spawn"));
    }

    #[test]
    fn test_spawn_failure_error() {
        let err = Error::SpawnFailure("no such file".to_string());
        assert_eq!(err.to_string(), "Spawn failure: no such file");
    }

    #[test]
    fn test_backend_unavailable_error() {
        let err = Error::BackendUnavailable("openpty failed".to_string());
        assert!(err.to_string().starts_with("PTY backend unavailable"));
    }

    #[test]
    fn test_invalid_dimensions_error() {
        let err = Error::InvalidDimensions { rows: 0, cols: 100 };
        assert_eq!(err.to_string(), "Invalid dimensions: 0x100");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_serialization_error_conversion() {
        let json_err = serde_json::from_str::<i32>("invalid json").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Serialization(_)));
    }

    #[test]
    fn test_error_debug() {
        let err = Error::Other("test".to_string());
        let debug_str = format!("{err:?}");
        assert!(debug_str.contains("Other"));
    }
}
