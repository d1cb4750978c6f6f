use crate::script_launcher::spawn_script;
use crate::{LogSink, SupervisorError, SupervisorResult};

use std::panic::Location;
use std::path::PathBuf;

use async_trait::async_trait;
use error_location::ErrorLocation;
use log::info;

/// The mutation step of an update. Only ever run while the server is stopped.
#[async_trait]
pub trait UpdateAction: Send + Sync {
    async fn run(&self) -> SupervisorResult<()>;
}

/// Runs the installation's update script to completion.
pub struct ScriptUpdater {
    script: PathBuf,
    working_dir: PathBuf,
    log: LogSink,
}

impl ScriptUpdater {
    pub fn new(script: PathBuf, working_dir: PathBuf, log: LogSink) -> Self {
        Self {
            script,
            working_dir,
            log,
        }
    }
}

#[async_trait]
impl UpdateAction for ScriptUpdater {
    async fn run(&self) -> SupervisorResult<()> {
        info!(
            "Running update script {}, output to {}",
            self.script.display(),
            self.log.path().display()
        );

        let mut child = spawn_script(&self.script, &self.working_dir, &Vec::new(), &self.log)?;
        let status = child.wait().await?;

        if !status.success() {
            return Err(SupervisorError::UpdateFailed {
                code: status.code(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        info!("Update script finished");
        Ok(())
    }
}
