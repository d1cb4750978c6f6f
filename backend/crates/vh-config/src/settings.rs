use crate::{
    CONFIG_DIR_ENV, ConfigError, ConfigErrorResult, HttpSettings, LifecycleSettings,
    LoggingSettings, PathsSettings, SETTINGS_FILENAME,
};

use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;

/// The warden's own configuration.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub http: HttpSettings,
    pub paths: PathsSettings,
    pub lifecycle: LifecycleSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    /// Load settings.
    ///
    /// Loading order:
    /// 1. `VH_CONFIG_DIR` if set, else the current directory
    /// 2. `warden.toml` in that directory if it exists, else defaults
    /// 3. `VH_*` environment variable overrides, then `PORT`
    /// 4. Relative paths resolved against the config directory
    ///
    /// Does NOT validate - call validate() after load().
    pub fn load() -> ConfigErrorResult<Self> {
        let config_dir = Self::config_dir()?;
        let settings_path = config_dir.join(SETTINGS_FILENAME);

        let mut settings = if settings_path.exists() {
            Self::load_toml(&settings_path)?
        } else {
            Settings::default()
        };

        settings.apply_env_overrides();
        settings.resolve_paths(&config_dir);

        Ok(settings)
    }

    fn load_toml(path: &Path) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Priority: VH_CONFIG_DIR env var > current working directory
    pub fn config_dir() -> ConfigErrorResult<PathBuf> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }

        std::env::current_dir()
            .map_err(|_| ConfigError::settings("Cannot determine current working directory"))
    }

    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.lifecycle.validate()?;

        if self.paths.start_script.trim().is_empty() {
            return Err(ConfigError::settings("paths.start_script must not be empty"));
        }

        if self.paths.update_script.trim().is_empty() {
            return Err(ConfigError::settings(
                "paths.update_script must not be empty",
            ));
        }

        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.http.host, self.http.port)
    }

    /// Log settings summary.
    pub fn log_summary(&self) {
        info!("Settings loaded:");
        info!("  http: {}", self.bind_addr());
        info!("  server_dir: {}", self.paths.server_dir.display());
        info!("  worlds_dir: {}", self.paths.worlds_dir.display());
        info!("  config_file: {}", self.paths.config_file.display());
        info!(
            "  logs: game={}, update={}",
            self.paths.log_file.display(),
            self.paths.update_log_file.display()
        );
        info!(
            "  scripts: start={}, update={}",
            self.paths.start_script, self.paths.update_script
        );
        info!(
            "  lifecycle: startup_timeout={}s, readiness_interval={}ms, probe_timeout={}ms, stop_timeout={}",
            self.lifecycle.startup_timeout_secs,
            self.lifecycle.readiness_interval_ms,
            self.lifecycle.probe_timeout_ms,
            match self.lifecycle.stop_timeout_secs {
                0 => String::from("unbounded"),
                secs => format!("{secs}s"),
            }
        );
        info!(
            "  logging: {} (colored: {})",
            self.logging.level, self.logging.colored
        );
    }

    fn apply_env_overrides(&mut self) {
        // HTTP
        Self::apply_env_string("VH_HTTP_HOST", &mut self.http.host);
        Self::apply_env_parse("VH_HTTP_PORT", &mut self.http.port);
        Self::apply_env_parse("PORT", &mut self.http.port);

        // Paths
        Self::apply_env_path("VH_SERVER_DIR", &mut self.paths.server_dir);
        Self::apply_env_path("VH_WORLDS_DIR", &mut self.paths.worlds_dir);
        Self::apply_env_path("VH_CONFIG_FILE", &mut self.paths.config_file);
        Self::apply_env_path("VH_LOG_FILE", &mut self.paths.log_file);
        Self::apply_env_path("VH_UPDATE_LOG_FILE", &mut self.paths.update_log_file);
        Self::apply_env_string("VH_START_SCRIPT", &mut self.paths.start_script);
        Self::apply_env_string("VH_UPDATE_SCRIPT", &mut self.paths.update_script);

        // Lifecycle
        Self::apply_env_parse(
            "VH_STARTUP_TIMEOUT_SECS",
            &mut self.lifecycle.startup_timeout_secs,
        );
        Self::apply_env_parse(
            "VH_READINESS_INTERVAL_MS",
            &mut self.lifecycle.readiness_interval_ms,
        );
        Self::apply_env_parse("VH_PROBE_TIMEOUT_MS", &mut self.lifecycle.probe_timeout_ms);
        Self::apply_env_parse("VH_STOP_TIMEOUT_SECS", &mut self.lifecycle.stop_timeout_secs);

        // Logging
        Self::apply_env_parse("VH_LOG_LEVEL", &mut self.logging.level);
        Self::apply_env_bool("VH_LOG_COLORED", &mut self.logging.colored);
        if let Ok(val) = std::env::var("VH_LOG_OUTPUT") {
            self.logging.file = Some(PathBuf::from(val));
        }
    }

    fn resolve_paths(&mut self, base: &Path) {
        let resolve = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        };

        resolve(&mut self.paths.server_dir);
        resolve(&mut self.paths.worlds_dir);
        resolve(&mut self.paths.config_file);
        resolve(&mut self.paths.log_file);
        resolve(&mut self.paths.update_log_file);
        if let Some(ref mut file) = self.logging.file {
            resolve(file);
        }
    }

    fn apply_env_string(var_name: &str, target: &mut String) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val;
        }
    }

    fn apply_env_path(var_name: &str, target: &mut PathBuf) {
        if let Ok(val) = std::env::var(var_name) {
            *target = PathBuf::from(val);
        }
    }

    /// Accepts "true"/"1"
    fn apply_env_bool(var_name: &str, target: &mut bool) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val == "true" || val == "1";
        }
    }

    fn apply_env_parse<T: std::str::FromStr>(var_name: &str, target: &mut T) {
        if let Ok(val) = std::env::var(var_name)
            && let Ok(parsed) = val.parse()
        {
            *target = parsed;
        }
    }
}
