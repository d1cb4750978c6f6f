use crate::{
    DEFAULT_CONFIG_FILE, DEFAULT_LOG_FILE, DEFAULT_SERVER_DIR, DEFAULT_START_SCRIPT,
    DEFAULT_UPDATE_LOG_FILE, DEFAULT_UPDATE_SCRIPT, DEFAULT_WORLDS_DIR,
};

use std::path::PathBuf;

use serde::Deserialize;

/// Filesystem collaborators of the supervised game server.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PathsSettings {
    /// Game server installation directory (holds both scripts)
    pub server_dir: PathBuf,
    /// Directory holding the `.fwl` / `.db` world files
    pub worlds_dir: PathBuf,
    /// Persisted game server record (JSON)
    pub config_file: PathBuf,
    /// Sink for the game server's stdout/stderr
    pub log_file: PathBuf,
    /// Sink for the update script's stdout/stderr
    pub update_log_file: PathBuf,
    /// Start script, relative to `server_dir`
    pub start_script: String,
    /// Update script, relative to `server_dir`
    pub update_script: String,
}

impl Default for PathsSettings {
    fn default() -> Self {
        Self {
            server_dir: PathBuf::from(DEFAULT_SERVER_DIR),
            worlds_dir: PathBuf::from(DEFAULT_WORLDS_DIR),
            config_file: PathBuf::from(DEFAULT_CONFIG_FILE),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            update_log_file: PathBuf::from(DEFAULT_UPDATE_LOG_FILE),
            start_script: String::from(DEFAULT_START_SCRIPT),
            update_script: String::from(DEFAULT_UPDATE_SCRIPT),
        }
    }
}

impl PathsSettings {
    pub fn start_script_path(&self) -> PathBuf {
        self.server_dir.join(&self.start_script)
    }

    pub fn update_script_path(&self) -> PathBuf {
        self.server_dir.join(&self.update_script)
    }
}
