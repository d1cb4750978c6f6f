use crate::LogLevel;

use std::path::PathBuf;

use serde::Deserialize;

/// Logging for the warden process itself (not the game server output).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: LogLevel,
    pub colored: bool,
    /// Log to this file instead of stdout
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            colored: true,
            file: None,
        }
    }
}
