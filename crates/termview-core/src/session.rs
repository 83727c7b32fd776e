//! Session identity and spawn parameter types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Unique identifier for a terminal session.
///
/// Opaque string of the form `sess-N`; the registry allocates them from a
/// monotonic counter so ids are never reused within a process lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Build an id from a monotonic sequence number.
    pub fn from_seq(seq: u64) -> Self {
        Self(format!("sess-{seq}"))
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The sequence number for a `sess-N` id, or `None` for an id in a
    /// foreign format.
    pub fn seq(&self) -> Option<u64> {
        self.0.strip_prefix("sess-")?.parse().ok()
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parameters for spawning a process into a session's PTY.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SpawnSpec {
    /// Shell or program path (e.g., "/bin/bash", "powershell.exe")
    pub shell: String,
    /// Program arguments
    pub args: Vec<String>,
    /// Working directory (inherited if absent)
    pub cwd: Option<String>,
    /// Extra environment variables, merged over the inherited environment
    pub env: Vec<(String, String)>,
}

impl Default for SpawnSpec {
    fn default() -> Self {
        Self {
            shell: if cfg!(windows) {
                "powershell.exe".to_string()
            } else {
                "/bin/bash".to_string()
            },
            args: Vec::new(),
            cwd: None,
            env: Vec::new(),
        }
    }
}

impl SpawnSpec {
    /// Spawn spec for a bare program with arguments.
    pub fn command(shell: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            shell: shell.into(),
            args,
            ..Default::default()
        }
    }
}

/// Read-only snapshot of one registry entry at call time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SessionSummary {
    /// Session identifier
    pub id: SessionId,
    /// Snapshot window columns (construction size)
    pub cols: u16,
    /// Snapshot window rows (construction size)
    pub rows: u16,
    /// Whether the process has exited
    pub exited: bool,
    /// Exit code, set exactly once at process exit
    pub exit_code: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_from_seq() {
        assert_eq!(SessionId::from_seq(0).as_str(), "sess-0");
        assert_eq!(SessionId::from_seq(42).to_string(), "sess-42");
    }

    #[test]
    fn test_session_id_seq() {
        assert_eq!(SessionId::from_seq(10).seq(), Some(10));
        assert_eq!(SessionId::from("custom-id").seq(), None);
        assert_eq!(SessionId::from("sess-x").seq(), None);
    }

    #[test]
    fn test_session_id_roundtrip() {
        let id = SessionId::from_seq(3);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"sess-3\"");
        let back: SessionId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_spawn_spec_default() {
        let spec = SpawnSpec::default();
        assert!(!spec.shell.is_empty());
        assert!(spec.args.is_empty());
        assert_eq!(spec.cwd, None);
        assert!(spec.env.is_empty());
    }

    #[test]
    fn test_spawn_spec_command() {
        let spec = SpawnSpec::command("/bin/echo", vec!["hello".to_string()]);
        assert_eq!(spec.shell, "/bin/echo");
        assert_eq!(spec.args, vec!["hello".to_string()]);
    }
}
