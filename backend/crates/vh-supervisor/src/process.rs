use crate::SupervisorResult;

use async_trait::async_trait;

/// Environment handed to a launched process, in addition to the inherited one.
pub type ProcessEnv = Vec<(String, String)>;

/// Starts the game server.
#[async_trait]
pub trait ProcessLauncher: Send + Sync {
    async fn launch(&self, env: &ProcessEnv) -> SupervisorResult<Box<dyn ManagedProcess>>;
}

/// A launched process. Owned exclusively by the supervisor.
#[async_trait]
pub trait ManagedProcess: Send + Sync {
    fn id(&self) -> Option<u32>;

    /// Ask the process to exit (SIGTERM). Does not wait.
    fn terminate(&mut self) -> SupervisorResult<()>;

    /// Force the process down (SIGKILL) and reap it.
    async fn kill(&mut self) -> SupervisorResult<()>;

    /// Exit code if the process has already exited. `Some(None)` means it
    /// exited without a code (killed by a signal).
    fn try_wait(&mut self) -> SupervisorResult<Option<Option<i32>>>;

    /// Wait for the process to exit and return its exit code.
    async fn wait(&mut self) -> SupervisorResult<Option<i32>>;
}
