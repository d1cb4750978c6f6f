use crate::{
    LogSink, ManagedProcess, ProcessEnv, ProcessLauncher, SupervisorError, SupervisorResult,
};

use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use error_location::ErrorLocation;
use log::{info, warn};
use tokio::process::{Child, Command};

/// Launches the game server by executing its start script.
///
/// The script runs with the projected environment on top of the inherited
/// one, in a new process group, with stdout and stderr appended to the log
/// sink.
pub struct ScriptLauncher {
    script: PathBuf,
    working_dir: PathBuf,
    log: LogSink,
}

impl ScriptLauncher {
    pub fn new(script: PathBuf, working_dir: PathBuf, log: LogSink) -> Self {
        Self {
            script,
            working_dir,
            log,
        }
    }
}

#[async_trait]
impl ProcessLauncher for ScriptLauncher {
    async fn launch(&self, env: &ProcessEnv) -> SupervisorResult<Box<dyn ManagedProcess>> {
        let child = spawn_script(&self.script, &self.working_dir, env, &self.log)?;
        info!(
            "Launched {} (pid {:?}), output to {}",
            self.script.display(),
            child.id(),
            self.log.path().display()
        );

        Ok(Box::new(ScriptProcess::new(child)))
    }
}

/// Spawn `script` in its own process group with output sent to `log`.
#[track_caller]
pub(crate) fn spawn_script(
    script: &Path,
    working_dir: &Path,
    env: &ProcessEnv,
    log: &LogSink,
) -> SupervisorResult<Child> {
    let mut command = Command::new(script);
    command
        .current_dir(working_dir)
        .envs(env.iter().map(|(key, value)| (key.as_str(), value.as_str())))
        .stdin(Stdio::null())
        .stdout(log.stdio()?)
        .stderr(log.stdio()?);

    #[cfg(unix)]
    command.process_group(0);

    command.spawn().map_err(|source| SupervisorError::ProcessSpawn {
        path: script.to_path_buf(),
        source,
        location: ErrorLocation::from(Location::caller()),
    })
}

/// A running start script and everything in its process group.
pub struct ScriptProcess {
    child: Child,
    /// Captured at spawn; `Child::id` returns `None` once the child is reaped
    pid: Option<u32>,
}

impl ScriptProcess {
    pub fn new(child: Child) -> Self {
        let pid = child.id();
        Self { child, pid }
    }

    #[cfg(unix)]
    fn signal_group(&self, signal: nix::sys::signal::Signal) -> SupervisorResult<()> {
        use nix::errno::Errno;
        use nix::sys::signal::killpg;
        use nix::unistd::Pid;

        let Some(pid) = self.pid else {
            return Ok(());
        };

        match killpg(Pid::from_raw(pid as i32), signal) {
            // Group already gone
            Ok(()) | Err(Errno::ESRCH) => Ok(()),
            Err(source) => Err(SupervisorError::Signal {
                pid,
                source,
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}

#[async_trait]
impl ManagedProcess for ScriptProcess {
    fn id(&self) -> Option<u32> {
        self.pid
    }

    fn terminate(&mut self) -> SupervisorResult<()> {
        #[cfg(unix)]
        {
            self.signal_group(nix::sys::signal::Signal::SIGTERM)
        }

        #[cfg(not(unix))]
        {
            self.child.start_kill().map_err(SupervisorError::from)
        }
    }

    async fn kill(&mut self) -> SupervisorResult<()> {
        warn!("Force killing server process group {:?}", self.pid);

        #[cfg(unix)]
        self.signal_group(nix::sys::signal::Signal::SIGKILL)?;

        #[cfg(not(unix))]
        self.child.start_kill()?;

        self.child.wait().await?;
        Ok(())
    }

    fn try_wait(&mut self) -> SupervisorResult<Option<Option<i32>>> {
        Ok(self.child.try_wait()?.map(|status| status.code()))
    }

    async fn wait(&mut self) -> SupervisorResult<Option<i32>> {
        let status = self.child.wait().await?;
        Ok(status.code())
    }
}
