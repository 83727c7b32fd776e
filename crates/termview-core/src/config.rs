//! Server configuration loaded from YAML.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Server settings
    pub server: ServerSettings,
    /// Terminal settings
    pub terminal: TerminalSettings,
}

impl ServerConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> crate::Result<Self> {
        let config: ServerConfig = serde_yaml::from_str(yaml)
            .map_err(|e| crate::Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> crate::Result<()> {
        if self.server.max_sessions == 0 {
            return Err(crate::Error::Config(
                "server.max_sessions must be > 0".to_string(),
            ));
        }

        // Zero dimensions mean an explicitly empty grid and are permitted
        // per-session, but not as the server default.
        if self.terminal.default_rows == 0 || self.terminal.default_cols == 0 {
            return Err(crate::Error::Config(
                "terminal default dimensions must be > 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Transport type (only stdio is supported)
    pub transport: String,
    /// Maximum number of concurrent sessions
    pub max_sessions: usize,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            transport: "stdio".to_string(),
            max_sessions: 16,
            log_level: "info".to_string(),
        }
    }
}

/// Terminal settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalSettings {
    /// Default terminal rows for new sessions
    pub default_rows: u16,
    /// Default terminal columns for new sessions
    pub default_cols: u16,
    /// Default shell when a spawn request omits one
    pub default_shell: Option<String>,
}

impl Default for TerminalSettings {
    fn default() -> Self {
        Self {
            // Wider than the classic 80x24 so TUI output is legible
            // in screenshots.
            default_rows: 40,
            default_cols: 120,
            default_shell: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = ServerConfig::default();
        assert_eq!(config.server.transport, "stdio");
        assert_eq!(config.server.max_sessions, 16);
        assert_eq!(config.terminal.default_rows, 40);
        assert_eq!(config.terminal.default_cols, 120);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_yaml() {
        let yaml = r#"
server:
  max_sessions: 4
  log_level: debug
terminal:
  default_rows: 24
  default_cols: 80
"#;
        let config = ServerConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.server.max_sessions, 4);
        assert_eq!(config.server.log_level, "debug");
        assert_eq!(config.terminal.default_rows, 24);
    }

    #[test]
    fn test_config_rejects_zero_sessions() {
        let yaml = "server:\n  max_sessions: 0\n";
        assert!(ServerConfig::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_config_rejects_zero_default_dimensions() {
        let yaml = "terminal:\n  default_rows: 0\n";
        assert!(ServerConfig::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_config_invalid_yaml() {
        let result = ServerConfig::from_yaml(": not yaml :");
        assert!(result.is_err());
    }
}
