use crate::{
    ConfigError, ConfigErrorResult, DEFAULT_PUBLIC, DEFAULT_SERVER_NAME, DEFAULT_SERVER_PASSWORD,
    DEFAULT_SERVER_PORT, DEFAULT_WORLD,
};

use std::path::Path;

use log::warn;
use serde::{Deserialize, Deserializer, Serialize};

/// Settings handed to the game server on every start.
///
/// Persisted as a flat JSON record and re-written before each launch, so the
/// file always reflects the configuration of the running (or last started)
/// server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub name: String,
    pub password: String,
    pub port: u16,
    pub world: String,
    #[serde(deserialize_with = "deserialize_visibility")]
    pub public: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: String::from(DEFAULT_SERVER_NAME),
            password: String::from(DEFAULT_SERVER_PASSWORD),
            port: DEFAULT_SERVER_PORT,
            world: String::from(DEFAULT_WORLD),
            public: DEFAULT_PUBLIC,
        }
    }
}

impl ServerConfig {
    /// Load the persisted record, or defaults when the file does not exist yet.
    pub fn load(path: &Path) -> ConfigErrorResult<Self> {
        if !path.exists() {
            let config = Self::default();
            warn!(
                "No server config at {}, using defaults (name={}, port={}, world={})",
                path.display(),
                config.name,
                config.port,
                config.world
            );
            return Ok(config);
        }

        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        serde_json::from_str(&contents).map_err(|e| ConfigError::Json {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Write the record, creating parent directories as needed.
    pub fn dump(&self, path: &Path) -> ConfigErrorResult<()> {
        if let Some(dir) = path.parent()
            && !dir.as_os_str().is_empty()
            && !dir.exists()
        {
            std::fs::create_dir_all(dir).map_err(|e| ConfigError::Io {
                path: dir.to_path_buf(),
                source: e,
            })?;
        }

        let contents = serde_json::to_string_pretty(self).map_err(|e| ConfigError::Json {
            path: path.to_path_buf(),
            source: e,
        })?;

        std::fs::write(path, contents).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })
    }

    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::server("name must not be empty"));
        }

        if self.world.trim().is_empty() {
            return Err(ConfigError::server("world must not be empty"));
        }

        if self.world.contains(['/', '\\']) {
            return Err(ConfigError::server(format!(
                "world must be a bare identifier, got {:?}",
                self.world
            )));
        }

        if self.port == 0 {
            return Err(ConfigError::server("port must not be 0"));
        }

        Ok(())
    }

    /// Field name / value pairs in declaration order, as the start script reads them.
    pub fn fields(&self) -> [(&'static str, String); 5] {
        [
            ("name", self.name.clone()),
            ("password", self.password.clone()),
            ("port", self.port.to_string()),
            ("world", self.world.clone()),
            ("public", String::from(if self.public { "1" } else { "0" })),
        ]
    }
}

/// Accepts `true`/`false` as well as the integer form (`1`/`0`).
pub(crate) fn deserialize_visibility<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Visibility {
        Flag(bool),
        Number(i64),
    }

    Ok(match Visibility::deserialize(deserializer)? {
        Visibility::Flag(flag) => flag,
        Visibility::Number(n) => n != 0,
    })
}
