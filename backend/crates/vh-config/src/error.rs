use std::panic::Location;
use std::path::PathBuf;
use std::result::Result as StdResult;

use error_location::ErrorLocation;
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum ConfigError {
    #[error("{category} error: {message} {location}")]
    Generic {
        category: &'static str,
        message: String,
        location: ErrorLocation,
    },

    #[error("IO error accessing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error in {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("JSON error in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ConfigError {
    /// Create a settings error
    #[track_caller]
    pub fn settings<S: Into<String>>(message: S) -> Self {
        ConfigError::Generic {
            category: "Settings",
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Create a game server config error
    #[track_caller]
    pub fn server<S: Into<String>>(message: S) -> Self {
        ConfigError::Generic {
            category: "Server config",
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// True when the error describes a rejected value rather than an I/O failure.
    pub fn is_invalid_value(&self) -> bool {
        matches!(self, ConfigError::Generic { .. })
    }
}

pub type ConfigErrorResult<T> = StdResult<T, ConfigError>;
