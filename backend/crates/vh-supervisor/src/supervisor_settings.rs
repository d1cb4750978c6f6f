use std::time::Duration;

use vh_config::LifecycleSettings;

/// How long a failed start gets to exit on SIGTERM before it is killed.
const DEFAULT_TEARDOWN_GRACE: Duration = Duration::from_secs(5);

/// Timing used by `ProcessSupervisor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupervisorSettings {
    pub startup_timeout: Duration,
    pub readiness_interval: Duration,
    /// `None` waits for exit forever
    pub stop_timeout: Option<Duration>,
    pub teardown_grace: Duration,
}

impl Default for SupervisorSettings {
    fn default() -> Self {
        Self::from(&LifecycleSettings::default())
    }
}

impl From<&LifecycleSettings> for SupervisorSettings {
    fn from(lifecycle: &LifecycleSettings) -> Self {
        Self {
            startup_timeout: lifecycle.startup_timeout(),
            readiness_interval: lifecycle.readiness_interval(),
            stop_timeout: lifecycle.stop_timeout(),
            teardown_grace: DEFAULT_TEARDOWN_GRACE,
        }
    }
}
