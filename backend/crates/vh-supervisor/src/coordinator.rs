//! The lifecycle gate and the operations that run under it.

use crate::{
    ChunkWriter, ConfigProjector, LogSink, ProcessSupervisor, ScriptLauncher, ScriptUpdater,
    ServerStatus, StatusSnapshot, SupervisorError, SupervisorResult, SupervisorSettings,
    UdpPortProber, UpdateAction, enumerate_world_files, list_worlds, write_archive,
};

use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use log::{debug, error, info, warn};
use tokio::sync::{Mutex, OwnedMutexGuard, mpsc, watch};
use tokio::task::spawn_blocking;
use tokio_stream::wrappers::ReceiverStream;
use vh_config::{ConfigOverrides, ServerConfig, Settings};

/// Archive chunks buffered between the archiver and the consumer.
const BACKUP_CHANNEL_CAPACITY: usize = 8;

/// Zip bytes of a backup, chunk by chunk.
///
/// An `Err` item ends the stream: either the archive could not be completed,
/// or it was completed and the server failed to come back up
/// (`RestartAfterBackup`).
pub type BackupStream = ReceiverStream<SupervisorResult<Bytes>>;

/// A request that changes the server's lifecycle state.
#[derive(Debug, Clone)]
pub enum Operation {
    Start(ConfigOverrides),
    Stop,
    Backup,
    Update,
}

#[derive(Debug)]
pub enum Outcome {
    Started,
    Stopped,
    Backup(BackupStream),
    Updated,
}

/// Serializes every lifecycle operation on one server.
///
/// The gate is a FIFO-fair mutex around the supervisor. A backup keeps
/// holding it after `backup` returns, until its stream is drained and the
/// server restarted.
pub struct LifecycleCoordinator {
    supervisor: Arc<Mutex<ProcessSupervisor>>,
    status_rx: watch::Receiver<StatusSnapshot>,
    updater: Arc<dyn UpdateAction>,
    worlds_dir: PathBuf,
}

impl LifecycleCoordinator {
    pub fn new(
        supervisor: ProcessSupervisor,
        updater: Arc<dyn UpdateAction>,
        worlds_dir: PathBuf,
    ) -> Self {
        let status_rx = supervisor.subscribe();

        Self {
            supervisor: Arc::new(Mutex::new(supervisor)),
            status_rx,
            updater,
            worlds_dir,
        }
    }

    /// Wire up the production collaborators described by `settings`.
    ///
    /// Truncates the game and update logs.
    pub fn from_settings(settings: &Settings) -> SupervisorResult<Self> {
        let paths = &settings.paths;

        let server_log = LogSink::open_truncated(&paths.log_file)?;
        let update_log = LogSink::open_truncated(&paths.update_log_file)?;

        let launcher = ScriptLauncher::new(
            paths.start_script_path(),
            paths.server_dir.clone(),
            server_log,
        );
        let prober = UdpPortProber::new(settings.lifecycle.probe_timeout());
        let supervisor = ProcessSupervisor::new(
            Arc::new(launcher),
            Arc::new(prober),
            ConfigProjector::new(paths.config_file.clone()),
            SupervisorSettings::from(&settings.lifecycle),
        );

        let updater = ScriptUpdater::new(
            paths.update_script_path(),
            paths.server_dir.clone(),
            update_log,
        );

        Ok(Self::new(
            supervisor,
            Arc::new(updater),
            paths.worlds_dir.clone(),
        ))
    }

    pub fn worlds_dir(&self) -> &Path {
        &self.worlds_dir
    }

    /// Latest published status. Does not wait for the gate.
    pub fn status(&self) -> StatusSnapshot {
        self.status_rx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<StatusSnapshot> {
        self.status_rx.clone()
    }

    /// Run `operation` under the gate.
    pub async fn execute(&self, operation: Operation) -> SupervisorResult<Outcome> {
        match operation {
            Operation::Start(overrides) => self.start(overrides).await.map(|()| Outcome::Started),
            Operation::Stop => self.stop().await.map(|_| Outcome::Stopped),
            Operation::Backup => self.backup().await.map(Outcome::Backup),
            Operation::Update => self.update().await.map(|()| Outcome::Updated),
        }
    }

    async fn acquire(&self) -> OwnedMutexGuard<ProcessSupervisor> {
        debug!("Waiting for lifecycle gate");
        Arc::clone(&self.supervisor).lock_owned().await
    }

    /// Start the server with the persisted config plus `overrides`.
    pub async fn start(&self, overrides: ConfigOverrides) -> SupervisorResult<()> {
        let mut supervisor = self.acquire().await;

        if supervisor.status() == ServerStatus::Running {
            return Err(SupervisorError::already_running());
        }

        let config = supervisor.projector().resolve(&overrides)?;
        supervisor.start(config).await
    }

    /// Stop the server and wait for it to exit.
    pub async fn stop(&self) -> SupervisorResult<ServerConfig> {
        let mut supervisor = self.acquire().await;
        supervisor.stop().await
    }

    /// Stop the server if running, then stream a zip of the worlds directory.
    ///
    /// The server is restarted with its previous config once the archive is
    /// complete. A stop failure aborts the backup before any file is read.
    pub async fn backup(&self) -> SupervisorResult<BackupStream> {
        let mut supervisor = self.acquire().await;
        let previous = stop_if_running(&mut supervisor).await?;

        let worlds_dir = self.worlds_dir.clone();
        let scanned = spawn_blocking(move || enumerate_world_files(&worlds_dir))
            .await
            .unwrap_or_else(|e| {
                Err(SupervisorError::internal(format!(
                    "World scan task failed: {e}"
                )))
            });

        let entries = match scanned {
            Ok(entries) => entries,
            Err(e) => {
                error!("Backup aborted, worlds directory could not be read: {e}");
                restore(&mut supervisor, previous).await?;
                return Err(e);
            }
        };

        info!(
            "Backing up {} files from {}",
            entries.len(),
            self.worlds_dir.display()
        );

        let (tx, rx) = mpsc::channel(BACKUP_CHANNEL_CAPACITY);

        tokio::spawn(async move {
            let mut supervisor = supervisor;

            let writer = ChunkWriter::new(tx.clone());
            let archived = spawn_blocking(move || write_archive(&entries, writer))
                .await
                .unwrap_or_else(|e| {
                    Err(SupervisorError::internal(format!(
                        "Backup archive task failed: {e}"
                    )))
                });

            match archived {
                Ok(()) => info!("Backup archive complete"),
                Err(e) => {
                    error!("Backup archive failed: {e}");
                    if tx.send(Err(e)).await.is_err() {
                        debug!("Backup consumer already gone");
                    }
                }
            }

            if let Some(config) = previous
                && let Err(e) = supervisor.start(config).await
            {
                error!("Server did not come back up after backup: {e}");
                if tx
                    .send(Err(SupervisorError::restart_after_backup(e)))
                    .await
                    .is_err()
                {
                    warn!("Backup consumer gone before restart failure could be reported");
                }
            }
        });

        Ok(ReceiverStream::new(rx))
    }

    /// Stop the server if running, run the update action, restore run state.
    ///
    /// The restart is attempted even when the update fails; a failed restart
    /// takes precedence in the returned error.
    pub async fn update(&self) -> SupervisorResult<()> {
        let mut supervisor = self.acquire().await;
        let previous = stop_if_running(&mut supervisor).await?;

        info!("Updating server");
        let updated = self.updater.run().await;
        if let Err(ref e) = updated {
            error!("Update failed: {e}");
        }

        if let Some(config) = previous
            && let Err(e) = supervisor.start(config).await
        {
            return Err(SupervisorError::restart_after_update(e));
        }

        updated
    }

    /// Distinct world names in the worlds directory. Does not take the gate.
    pub async fn list_worlds(&self) -> SupervisorResult<Vec<String>> {
        let worlds_dir = self.worlds_dir.clone();

        spawn_blocking(move || list_worlds(&worlds_dir))
            .await
            .unwrap_or_else(|e| {
                Err(SupervisorError::internal(format!(
                    "World listing task failed: {e}"
                )))
            })
    }

    /// Stop the server if it is running. Waits behind any in-flight operation.
    pub async fn shutdown(&self) -> SupervisorResult<()> {
        let mut supervisor = self.acquire().await;

        if supervisor.status() == ServerStatus::Stopped {
            return Ok(());
        }

        info!("Stopping server before exit");
        supervisor.stop().await.map(|_| ())
    }
}

async fn stop_if_running(
    supervisor: &mut ProcessSupervisor,
) -> SupervisorResult<Option<ServerConfig>> {
    match supervisor.status() {
        ServerStatus::Running => supervisor.stop().await.map(Some),
        ServerStatus::Stopped => Ok(None),
    }
}

/// Restart with `previous` if the server was running before a backup.
pub(crate) async fn restore(
    supervisor: &mut ProcessSupervisor,
    previous: Option<ServerConfig>,
) -> SupervisorResult<()> {
    if let Some(config) = previous
        && let Err(e) = supervisor.start(config).await
    {
        error!("Failed to restart server: {e}");
        return Err(SupervisorError::restart_after_backup(e));
    }

    Ok(())
}
