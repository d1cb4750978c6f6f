use crate::ServerStatus;

use vh_config::ServerConfig;

/// Published after every lifecycle transition.
///
/// Readers never need the lifecycle gate to look at it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub status: ServerStatus,
    pub pid: Option<u32>,
    /// Config of the running server; `None` while stopped
    pub config: Option<ServerConfig>,
    /// Most recent lifecycle failure, cleared by the next successful start
    pub last_error: Option<String>,
}

impl StatusSnapshot {
    pub fn stopped() -> Self {
        Self {
            status: ServerStatus::Stopped,
            pid: None,
            config: None,
            last_error: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.status == ServerStatus::Running
    }
}
