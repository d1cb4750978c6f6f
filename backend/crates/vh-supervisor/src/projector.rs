use crate::{ProcessEnv, SupervisorResult};

use std::path::{Path, PathBuf};

use log::debug;
use vh_config::{ConfigOverrides, ServerConfig};

/// Prefix of every environment variable the start script reads its settings from.
pub const ENV_PREFIX: &str = "server_";

/// Materializes a `ServerConfig` into the forms the game server consumes.
#[derive(Debug, Clone)]
pub struct ConfigProjector {
    config_file: PathBuf,
}

impl ConfigProjector {
    pub fn new(config_file: PathBuf) -> Self {
        Self { config_file }
    }

    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    /// Persisted config with `overrides` applied on top.
    pub fn resolve(&self, overrides: &ConfigOverrides) -> SupervisorResult<ServerConfig> {
        let mut config = ServerConfig::load(&self.config_file)?;
        overrides.apply(&mut config);
        Ok(config)
    }

    /// Validate and persist `config`, returning the environment for the launch.
    ///
    /// Nothing is written for an invalid config.
    pub fn project(&self, config: &ServerConfig) -> SupervisorResult<ProcessEnv> {
        config.validate()?;
        config.dump(&self.config_file)?;
        debug!("Wrote server config to {}", self.config_file.display());

        Ok(environment(config))
    }
}

/// One `server_<field>` variable per config field.
pub fn environment(config: &ServerConfig) -> ProcessEnv {
    config
        .fields()
        .into_iter()
        .map(|(field, value)| (format!("{ENV_PREFIX}{field}"), value))
        .collect()
}
