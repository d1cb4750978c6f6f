//! Game server process lifecycle.

use crate::{
    ConfigProjector, ManagedProcess, ProcessLauncher, Prober, ServerStatus, StatusSnapshot,
    SupervisorError, SupervisorResult, SupervisorSettings,
};

use std::panic::Location;
use std::sync::Arc;

use error_location::ErrorLocation;
use log::{error, info, warn};
use tokio::sync::watch;
use tokio::time::{Instant, sleep, timeout};
use vh_config::ServerConfig;

/// Handle and config exist exactly while the server is running.
enum ProcessState {
    Stopped,
    Running {
        config: ServerConfig,
        process: Box<dyn ManagedProcess>,
    },
}

/// Owns the game server process.
///
/// Not synchronized: every call must be made while holding the lifecycle
/// gate (see `LifecycleCoordinator`).
pub struct ProcessSupervisor {
    launcher: Arc<dyn ProcessLauncher>,
    prober: Arc<dyn Prober>,
    projector: ConfigProjector,
    settings: SupervisorSettings,
    state: ProcessState,
    status_tx: watch::Sender<StatusSnapshot>,
}

impl ProcessSupervisor {
    pub fn new(
        launcher: Arc<dyn ProcessLauncher>,
        prober: Arc<dyn Prober>,
        projector: ConfigProjector,
        settings: SupervisorSettings,
    ) -> Self {
        let (status_tx, _) = watch::channel(StatusSnapshot::stopped());

        Self {
            launcher,
            prober,
            projector,
            settings,
            state: ProcessState::Stopped,
            status_tx,
        }
    }

    /// Subscribe to status changes.
    pub fn subscribe(&self) -> watch::Receiver<StatusSnapshot> {
        self.status_tx.subscribe()
    }

    pub fn status(&self) -> ServerStatus {
        match self.state {
            ProcessState::Stopped => ServerStatus::Stopped,
            ProcessState::Running { .. } => ServerStatus::Running,
        }
    }

    /// Config of the running server.
    pub fn config(&self) -> Option<&ServerConfig> {
        match self.state {
            ProcessState::Stopped => None,
            ProcessState::Running { ref config, .. } => Some(config),
        }
    }

    pub fn projector(&self) -> &ConfigProjector {
        &self.projector
    }

    /// Project `config`, launch the server and wait until its port is bound.
    ///
    /// On any failure the launched process is torn down and the status stays
    /// `Stopped`.
    pub async fn start(&mut self, config: ServerConfig) -> SupervisorResult<()> {
        if let ProcessState::Running { .. } = self.state {
            return Err(SupervisorError::already_running());
        }

        let result = self.launch_until_ready(config).await;
        if let Err(ref e) = result {
            self.record_failure(e);
        }

        result
    }

    async fn launch_until_ready(&mut self, config: ServerConfig) -> SupervisorResult<()> {
        let env = self.projector.project(&config)?;

        info!(
            "Starting server '{}' (world '{}', port {})",
            config.name, config.world, config.port
        );
        let mut process = self.launcher.launch(&env).await?;

        match self.wait_ready(process.as_mut(), config.port).await {
            Ok(()) => {
                let pid = process.id();
                info!("Server ready on port {} (pid {:?})", config.port, pid);

                self.status_tx.send_replace(StatusSnapshot {
                    status: ServerStatus::Running,
                    pid,
                    config: Some(config.clone()),
                    last_error: None,
                });
                self.state = ProcessState::Running { config, process };

                Ok(())
            }
            Err(e) => {
                warn!("Server failed to start, tearing it down: {e}");
                self.teardown(process).await;
                Err(e)
            }
        }
    }

    /// Poll the prober at a fixed interval until ready, exited, or out of time.
    async fn wait_ready(
        &self,
        process: &mut dyn ManagedProcess,
        port: u16,
    ) -> SupervisorResult<()> {
        let deadline = Instant::now() + self.settings.startup_timeout;

        loop {
            if self.prober.probe(port).await {
                return Ok(());
            }

            if let Some(code) = process.try_wait()? {
                return Err(SupervisorError::ProcessExited {
                    code,
                    location: ErrorLocation::from(Location::caller()),
                });
            }

            if Instant::now() >= deadline {
                return Err(SupervisorError::StartupTimeout {
                    port,
                    timeout_secs: self.settings.startup_timeout.as_secs(),
                    location: ErrorLocation::from(Location::caller()),
                });
            }

            sleep(self.settings.readiness_interval).await;
        }
    }

    /// SIGTERM, a short grace period, then SIGKILL. Always reaps.
    async fn teardown(&self, mut process: Box<dyn ManagedProcess>) {
        if let Err(e) = process.terminate() {
            warn!("Failed to signal server during teardown: {e}");
        }

        match timeout(self.settings.teardown_grace, process.wait()).await {
            Ok(Ok(code)) => {
                info!("Failed server exited with code {code:?}");
                return;
            }
            Ok(Err(e)) => warn!("Failed waiting for server exit: {e}"),
            Err(_) => warn!(
                "Server still alive {}s after SIGTERM",
                self.settings.teardown_grace.as_secs()
            ),
        }

        if let Err(e) = process.kill().await {
            error!("Failed to kill server: {e}");
        }
    }

    /// Terminate the server and wait for it to exit.
    ///
    /// Returns the config it was running with so callers can restart it.
    pub async fn stop(&mut self) -> SupervisorResult<ServerConfig> {
        let ProcessState::Running {
            config,
            mut process,
        } = std::mem::replace(&mut self.state, ProcessState::Stopped)
        else {
            return Err(SupervisorError::already_stopped());
        };

        info!("Stopping server (pid {:?})", process.id());

        if let Err(e) = process.terminate() {
            error!("Failed to signal server, it is still running: {e}");
            self.record_failure(&e);
            self.state = ProcessState::Running { config, process };
            return Err(e);
        }

        let exited = self.await_exit(process.as_mut()).await;

        self.status_tx.send_modify(|snapshot| {
            snapshot.status = ServerStatus::Stopped;
            snapshot.pid = None;
            snapshot.config = None;
        });

        match exited {
            Ok(code) => {
                info!("Server stopped (exit code {code:?})");
                Ok(config)
            }
            Err(e) => {
                self.record_failure(&e);
                Err(e)
            }
        }
    }

    async fn await_exit(&self, process: &mut dyn ManagedProcess) -> SupervisorResult<Option<i32>> {
        let Some(limit) = self.settings.stop_timeout else {
            return process.wait().await;
        };

        match timeout(limit, process.wait()).await {
            Ok(exited) => exited,
            Err(_) => {
                warn!(
                    "Server did not exit within {}s of SIGTERM",
                    limit.as_secs()
                );
                process.kill().await?;
                Ok(None)
            }
        }
    }

    fn record_failure(&self, error: &SupervisorError) {
        let message = error.to_string();
        self.status_tx
            .send_modify(|snapshot| snapshot.last_error = Some(message));
    }
}
