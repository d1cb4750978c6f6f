mod archive;
mod coordinator;
mod error;
mod log_sink;
mod process;
mod projector;
mod prober;
mod script_launcher;
mod server_status;
mod status_snapshot;
mod supervisor;
mod supervisor_settings;
mod updater;
mod worlds;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use archive::{ArchiveEntry, CHUNK_SIZE, ChunkWriter, enumerate_world_files, write_archive};
pub use coordinator::{BackupStream, LifecycleCoordinator, Operation, Outcome};
pub use error::{Result as SupervisorResult, SupervisorError};
pub use log_sink::LogSink;
pub use process::{ManagedProcess, ProcessEnv, ProcessLauncher};
pub use projector::{ConfigProjector, ENV_PREFIX, environment};
pub use prober::{Prober, UdpPortProber, socket_table_has_port, ss_output_has_port};
pub use script_launcher::{ScriptLauncher, ScriptProcess};
pub use server_status::ServerStatus;
pub use status_snapshot::StatusSnapshot;
pub use supervisor::ProcessSupervisor;
pub use supervisor_settings::SupervisorSettings;
pub use updater::{ScriptUpdater, UpdateAction};
pub use worlds::{WORLD_FILE_EXTENSIONS, list_worlds};

#[cfg(test)]
mod tests;
