//! In-memory stand-ins for the process, probe and update collaborators.

use crate::{
    ManagedProcess, ProcessEnv, ProcessLauncher, Prober, SupervisorError, SupervisorResult,
    UpdateAction,
};

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

/// How a fake process reacts to the supervisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FakeBehavior {
    /// Exits with code 0 on SIGTERM
    Graceful,
    /// Has already exited with the given code by the first readiness check
    ExitsEarly(Option<i32>),
    /// Ignores SIGTERM; only SIGKILL brings it down
    IgnoresTerm,
    /// Signalling it fails, as if the process group could not be reached
    RefusesSignals,
}

#[derive(Debug, Default)]
struct LaunchLog {
    launches: usize,
    live: usize,
    max_live: usize,
    last_env: Option<ProcessEnv>,
}

fn lock(log: &Mutex<LaunchLog>) -> MutexGuard<'_, LaunchLog> {
    log.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Launches `FakeProcess`es and records how many are alive at once.
pub struct FakeLauncher {
    log: Arc<Mutex<LaunchLog>>,
    behavior: Mutex<FakeBehavior>,
    refuse: AtomicBool,
}

impl FakeLauncher {
    pub fn new(behavior: FakeBehavior) -> Self {
        Self {
            log: Arc::new(Mutex::new(LaunchLog::default())),
            behavior: Mutex::new(behavior),
            refuse: AtomicBool::new(false),
        }
    }

    /// Behavior of processes launched from now on.
    pub fn set_behavior(&self, behavior: FakeBehavior) {
        *self.behavior.lock().unwrap_or_else(PoisonError::into_inner) = behavior;
    }

    /// Make every following launch fail to spawn.
    pub fn refuse_launches(&self, refuse: bool) {
        self.refuse.store(refuse, Ordering::SeqCst);
    }

    pub fn launches(&self) -> usize {
        lock(&self.log).launches
    }

    /// Processes launched and not yet reaped.
    pub fn live(&self) -> usize {
        lock(&self.log).live
    }

    /// Highest number of processes ever alive at the same time.
    pub fn max_live(&self) -> usize {
        lock(&self.log).max_live
    }

    pub fn last_env(&self) -> Option<ProcessEnv> {
        lock(&self.log).last_env.clone()
    }

    fn live_counter(&self) -> Arc<Mutex<LaunchLog>> {
        Arc::clone(&self.log)
    }
}

#[async_trait]
impl ProcessLauncher for FakeLauncher {
    async fn launch(&self, env: &ProcessEnv) -> SupervisorResult<Box<dyn ManagedProcess>> {
        if self.refuse.load(Ordering::SeqCst) {
            return Err(SupervisorError::internal("fake launch refused"));
        }

        let behavior = *self.behavior.lock().unwrap_or_else(PoisonError::into_inner);

        let pid = {
            let mut log = lock(&self.log);
            log.launches += 1;
            log.live += 1;
            log.max_live = log.max_live.max(log.live);
            log.last_env = Some(env.clone());
            log.launches as u32 + 1000
        };

        tokio::task::yield_now().await;

        Ok(Box::new(FakeProcess {
            pid,
            behavior,
            exit: None,
            reaped: false,
            log: Arc::clone(&self.log),
        }))
    }
}

/// A pretend server process.
pub struct FakeProcess {
    pid: u32,
    behavior: FakeBehavior,
    /// Set once the process has exited
    exit: Option<Option<i32>>,
    reaped: bool,
    log: Arc<Mutex<LaunchLog>>,
}

impl FakeProcess {
    fn exited(&self) -> Option<Option<i32>> {
        match self.behavior {
            FakeBehavior::ExitsEarly(code) => Some(self.exit.unwrap_or(code)),
            _ => self.exit,
        }
    }

    fn reap(&mut self) {
        if !self.reaped {
            self.reaped = true;
            lock(&self.log).live -= 1;
        }
    }
}

#[async_trait]
impl ManagedProcess for FakeProcess {
    fn id(&self) -> Option<u32> {
        Some(self.pid)
    }

    fn terminate(&mut self) -> SupervisorResult<()> {
        match self.behavior {
            FakeBehavior::Graceful if self.exit.is_none() => self.exit = Some(Some(0)),
            FakeBehavior::RefusesSignals => {
                return Err(SupervisorError::internal("fake process refused SIGTERM"));
            }
            _ => {}
        }
        Ok(())
    }

    async fn kill(&mut self) -> SupervisorResult<()> {
        if self.exited().is_none() {
            self.exit = Some(None);
        }
        self.reap();
        Ok(())
    }

    fn try_wait(&mut self) -> SupervisorResult<Option<Option<i32>>> {
        let exited = self.exited();
        if exited.is_some() {
            self.reap();
        }
        Ok(exited)
    }

    async fn wait(&mut self) -> SupervisorResult<Option<i32>> {
        match self.exited() {
            Some(code) => {
                self.reap();
                Ok(code)
            }
            None => std::future::pending().await,
        }
    }
}

/// Readiness answer controlled by the test.
pub struct FakeProber {
    ready: AtomicBool,
    probes: AtomicUsize,
}

impl FakeProber {
    pub fn new(ready: bool) -> Self {
        Self {
            ready: AtomicBool::new(ready),
            probes: AtomicUsize::new(0),
        }
    }

    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::SeqCst);
    }

    pub fn probes(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Prober for FakeProber {
    async fn probe(&self, _port: u16) -> bool {
        self.probes.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        self.ready.load(Ordering::SeqCst)
    }
}

/// Update action that records whether any server process was alive while it ran.
pub struct FakeUpdater {
    fail: AtomicBool,
    runs: AtomicUsize,
    ran_while_live: AtomicBool,
    live: Option<Arc<Mutex<LaunchLog>>>,
}

impl FakeUpdater {
    pub fn new() -> Self {
        Self {
            fail: AtomicBool::new(false),
            runs: AtomicUsize::new(0),
            ran_while_live: AtomicBool::new(false),
            live: None,
        }
    }

    /// Watch the processes of `launcher` while running.
    pub fn observing(launcher: &FakeLauncher) -> Self {
        Self {
            live: Some(launcher.live_counter()),
            ..Self::new()
        }
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn runs(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }

    pub fn ran_while_live(&self) -> bool {
        self.ran_while_live.load(Ordering::SeqCst)
    }
}

impl Default for FakeUpdater {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UpdateAction for FakeUpdater {
    async fn run(&self) -> SupervisorResult<()> {
        self.runs.fetch_add(1, Ordering::SeqCst);

        if let Some(ref log) = self.live
            && lock(log).live > 0
        {
            self.ran_while_live.store(true, Ordering::SeqCst);
        }

        tokio::task::yield_now().await;

        if self.fail.load(Ordering::SeqCst) {
            return Err(SupervisorError::UpdateFailed {
                code: Some(1),
                location: error_location::ErrorLocation::from(std::panic::Location::caller()),
            });
        }

        Ok(())
    }
}
