
use crate::testing::{FakeBehavior, FakeLauncher, FakeProber, FakeUpdater};
use crate::{
    BackupStream, ConfigProjector, LifecycleCoordinator, ProcessSupervisor, SupervisorResult,
    SupervisorSettings,
};

use std::collections::BTreeSet;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use futures::StreamExt;
use tempfile::TempDir;

/// Short enough that timeout tests finish quickly.
pub(crate) fn fast_settings() -> SupervisorSettings {
    SupervisorSettings {
        startup_timeout: Duration::from_millis(200),
        readiness_interval: Duration::from_millis(10),
        stop_timeout: Some(Duration::from_millis(500)),
        teardown_grace: Duration::from_millis(50),
    }
}

/// A supervisor wired to fakes, persisting its config under `dir`.
pub(crate) fn supervisor_in(
    dir: &Path,
    launcher: &Arc<FakeLauncher>,
    prober: &Arc<FakeProber>,
) -> ProcessSupervisor {
    ProcessSupervisor::new(
        launcher.clone(),
        prober.clone(),
        ConfigProjector::new(dir.join("config.json")),
        fast_settings(),
    )
}

/// A coordinator wired to fakes, rooted in a temp directory.
pub(crate) struct Harness {
    pub temp: TempDir,
    pub launcher: Arc<FakeLauncher>,
    pub prober: Arc<FakeProber>,
    pub updater: Arc<FakeUpdater>,
    pub coordinator: LifecycleCoordinator,
}

impl Harness {
    pub fn new(behavior: FakeBehavior, ready: bool) -> Self {
        let temp = TempDir::new().unwrap();
        let launcher = Arc::new(FakeLauncher::new(behavior));
        let prober = Arc::new(FakeProber::new(ready));
        let updater = Arc::new(FakeUpdater::observing(&launcher));

        let supervisor = supervisor_in(temp.path(), &launcher, &prober);
        let coordinator =
            LifecycleCoordinator::new(supervisor, updater.clone(), temp.path().join("worlds"));

        Self {
            temp,
            launcher,
            prober,
            updater,
            coordinator,
        }
    }

    pub fn ready() -> Self {
        Self::new(FakeBehavior::Graceful, true)
    }

    pub fn worlds_dir(&self) -> &Path {
        self.coordinator.worlds_dir()
    }

    pub fn write_world_file(&self, name: &str, contents: &[u8]) {
        let path = self.worlds_dir().join(name);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
    }
}

/// Drain a backup stream, keeping every item.
pub(crate) async fn drain(stream: BackupStream) -> Vec<SupervisorResult<Bytes>> {
    stream.collect().await
}

/// Concatenate the chunks of a fully successful backup.
pub(crate) fn archive_bytes(items: Vec<SupervisorResult<Bytes>>) -> Vec<u8> {
    items
        .into_iter()
        .flat_map(|item| item.unwrap().to_vec())
        .collect()
}

/// Entry names of a zip held in memory.
pub(crate) fn archive_names(bytes: Vec<u8>) -> BTreeSet<String> {
    let archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    archive.file_names().map(String::from).collect()
}
