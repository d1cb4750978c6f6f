use std::panic::Location;
use std::path::PathBuf;

use error_location::ErrorLocation;
use thiserror::Error;
use vh_config::ConfigError;

#[derive(Error, Debug)]
pub enum SupervisorError {
    #[error("Server already running {location}")]
    AlreadyRunning { location: ErrorLocation },

    #[error("Server already stopped {location}")]
    AlreadyStopped { location: ErrorLocation },

    #[error("Server did not start up within {timeout_secs} seconds (port {port}) {location}")]
    StartupTimeout {
        port: u16,
        timeout_secs: u64,
        location: ErrorLocation,
    },

    #[error("Server process exited during startup with code {code:?} {location}")]
    ProcessExited {
        code: Option<i32>,
        location: ErrorLocation,
    },

    #[error("Failed to spawn {path}: {source} {location}")]
    ProcessSpawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[cfg(unix)]
    #[error("Failed to signal process group {pid}: {source} {location}")]
    Signal {
        pid: u32,
        #[source]
        source: nix::Error,
        location: ErrorLocation,
    },

    #[error("Failed to open log sink {path}: {source} {location}")]
    LogSink {
        path: PathBuf,
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error("Server config rejected: {source}")]
    Config {
        #[source]
        source: ConfigError,
        location: ErrorLocation,
    },

    #[error("Failed to archive worlds: {source} {location}")]
    Archive {
        #[source]
        source: zip::result::ZipError,
        location: ErrorLocation,
    },

    #[error("Failed to read worlds directory {path}: {source} {location}")]
    WorldsScan {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
        location: ErrorLocation,
    },

    #[error("Update script exited with code {code:?} {location}")]
    UpdateFailed {
        code: Option<i32>,
        location: ErrorLocation,
    },

    #[error("Backup captured but the server failed to restart: {source}")]
    RestartAfterBackup {
        #[source]
        source: Box<SupervisorError>,
        location: ErrorLocation,
    },

    #[error("Update finished but the server failed to restart: {source}")]
    RestartAfterUpdate {
        #[source]
        source: Box<SupervisorError>,
        location: ErrorLocation,
    },

    #[error("IO error: {source} {location}")]
    Io {
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error("Internal error: {message} {location}")]
    Internal {
        message: String,
        location: ErrorLocation,
    },
}

impl SupervisorError {
    #[track_caller]
    pub fn already_running() -> Self {
        Self::AlreadyRunning {
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn already_stopped() -> Self {
        Self::AlreadyStopped {
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn restart_after_backup(source: SupervisorError) -> Self {
        Self::RestartAfterBackup {
            source: Box::new(source),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn restart_after_update(source: SupervisorError) -> Self {
        Self::RestartAfterUpdate {
            source: Box::new(source),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Caller asked for a transition the current status does not allow.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::AlreadyRunning { .. } | Self::AlreadyStopped { .. }
        )
    }

    /// The requested server config itself was invalid.
    pub fn is_invalid_config(&self) -> bool {
        matches!(self, Self::Config { source, .. } if source.is_invalid_value())
    }
}

impl From<std::io::Error> for SupervisorError {
    #[track_caller]
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<ConfigError> for SupervisorError {
    #[track_caller]
    fn from(source: ConfigError) -> Self {
        Self::Config {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<zip::result::ZipError> for SupervisorError {
    #[track_caller]
    fn from(source: zip::result::ZipError) -> Self {
        Self::Archive {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, SupervisorError>;
