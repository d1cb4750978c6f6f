mod config_overrides;
mod error;
mod http_settings;
mod lifecycle_settings;
mod log_level;
mod logging_settings;
mod paths_settings;
mod server_config;
mod settings;

pub use config_overrides::ConfigOverrides;
pub use error::{ConfigError, ConfigErrorResult};
pub use http_settings::HttpSettings;
pub use lifecycle_settings::LifecycleSettings;
pub use log_level::LogLevel;
pub use logging_settings::LoggingSettings;
pub use paths_settings::PathsSettings;
pub use server_config::ServerConfig;
pub use settings::Settings;

#[cfg(test)]
mod tests;

// Warden settings
const SETTINGS_FILENAME: &str = "warden.toml";
const CONFIG_DIR_ENV: &str = "VH_CONFIG_DIR";
const DEFAULT_HTTP_HOST: &str = "0.0.0.0";
const DEFAULT_HTTP_PORT: u16 = 8080;
const DEFAULT_SERVER_DIR: &str = "/home/valheim/server";
const DEFAULT_WORLDS_DIR: &str = "/home/valheim/.config/unity3d/IronGate/Valheim/worlds";
const DEFAULT_CONFIG_FILE: &str = "config.json";
const DEFAULT_LOG_FILE: &str = "valheim.log";
const DEFAULT_UPDATE_LOG_FILE: &str = "valheim.update.log";
const DEFAULT_START_SCRIPT: &str = "start_server_bepinex.sh";
const DEFAULT_UPDATE_SCRIPT: &str = "update.sh";
const DEFAULT_STARTUP_TIMEOUT_SECS: u64 = 120;
const DEFAULT_READINESS_INTERVAL_MS: u64 = 1000;
const DEFAULT_PROBE_TIMEOUT_MS: u64 = 2000;
const DEFAULT_STOP_TIMEOUT_SECS: u64 = 0;
const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;

// Game server record
const DEFAULT_SERVER_NAME: &str = "Valheim Server";
const DEFAULT_SERVER_PASSWORD: &str = "secret";
const DEFAULT_SERVER_PORT: u16 = 27000;
const DEFAULT_WORLD: &str = "world";
const DEFAULT_PUBLIC: bool = true;
