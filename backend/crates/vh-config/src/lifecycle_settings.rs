use crate::{
    ConfigError, ConfigErrorResult, DEFAULT_PROBE_TIMEOUT_MS, DEFAULT_READINESS_INTERVAL_MS,
    DEFAULT_STARTUP_TIMEOUT_SECS, DEFAULT_STOP_TIMEOUT_SECS,
};

use std::time::Duration;

use serde::Deserialize;

/// Timing budget for start/stop of the game server.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LifecycleSettings {
    /// Give up waiting for the game port after this many seconds
    pub startup_timeout_secs: u64,
    /// Delay between readiness probes
    pub readiness_interval_ms: u64,
    /// Upper bound on a single readiness probe
    pub probe_timeout_ms: u64,
    /// SIGKILL a stopping server after this many seconds (0 = wait forever)
    pub stop_timeout_secs: u64,
}

impl Default for LifecycleSettings {
    fn default() -> Self {
        Self {
            startup_timeout_secs: DEFAULT_STARTUP_TIMEOUT_SECS,
            readiness_interval_ms: DEFAULT_READINESS_INTERVAL_MS,
            probe_timeout_ms: DEFAULT_PROBE_TIMEOUT_MS,
            stop_timeout_secs: DEFAULT_STOP_TIMEOUT_SECS,
        }
    }
}

impl LifecycleSettings {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.startup_timeout_secs == 0 {
            return Err(ConfigError::settings(
                "lifecycle.startup_timeout_secs must be greater than 0",
            ));
        }

        if self.readiness_interval_ms == 0 {
            return Err(ConfigError::settings(
                "lifecycle.readiness_interval_ms must be greater than 0",
            ));
        }

        if self.readiness_interval() > self.startup_timeout() {
            return Err(ConfigError::settings(format!(
                "lifecycle.readiness_interval_ms ({}) exceeds the startup timeout ({}s)",
                self.readiness_interval_ms, self.startup_timeout_secs
            )));
        }

        if self.probe_timeout_ms == 0 {
            return Err(ConfigError::settings(
                "lifecycle.probe_timeout_ms must be greater than 0",
            ));
        }

        Ok(())
    }

    pub fn startup_timeout(&self) -> Duration {
        Duration::from_secs(self.startup_timeout_secs)
    }

    pub fn readiness_interval(&self) -> Duration {
        Duration::from_millis(self.readiness_interval_ms)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    /// `None` means the stop wait is unbounded.
    pub fn stop_timeout(&self) -> Option<Duration> {
        (self.stop_timeout_secs > 0).then(|| Duration::from_secs(self.stop_timeout_secs))
    }
}
