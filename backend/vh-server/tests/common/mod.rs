#![allow(dead_code)]

//! Test infrastructure for vh-server API tests

use vh_server::AppState;
use vh_supervisor::testing::{FakeBehavior, FakeLauncher, FakeProber, FakeUpdater};
use vh_supervisor::{ConfigProjector, LifecycleCoordinator, ProcessSupervisor, SupervisorSettings};

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{Request, Response},
};
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

/// Router wired to fake collaborators, plus handles to inspect them
pub struct TestApp {
    pub temp: TempDir,
    pub state: AppState,
    pub launcher: Arc<FakeLauncher>,
    pub prober: Arc<FakeProber>,
    pub updater: Arc<FakeUpdater>,
}

impl TestApp {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let launcher = Arc::new(FakeLauncher::new(FakeBehavior::Graceful));
        let prober = Arc::new(FakeProber::new(true));
        let updater = Arc::new(FakeUpdater::observing(&launcher));

        let settings = SupervisorSettings {
            startup_timeout: Duration::from_millis(200),
            readiness_interval: Duration::from_millis(10),
            stop_timeout: Some(Duration::from_millis(500)),
            teardown_grace: Duration::from_millis(50),
        };
        let supervisor = ProcessSupervisor::new(
            launcher.clone(),
            prober.clone(),
            ConfigProjector::new(temp.path().join("config.json")),
            settings,
        );
        let coordinator =
            LifecycleCoordinator::new(supervisor, updater.clone(), temp.path().join("worlds"));

        Self {
            temp,
            state: AppState::new(coordinator),
            launcher,
            prober,
            updater,
        }
    }

    pub fn router(&self) -> Router {
        vh_server::build_router(self.state.clone())
    }

    pub fn worlds_dir(&self) -> &Path {
        self.state.coordinator.worlds_dir()
    }

    pub fn write_world_file(&self, name: &str, contents: &[u8]) {
        let path = self.worlds_dir().join(name);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
    }

    pub async fn send(&self, method: &str, uri: &str, body: Body) -> Response<Body> {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(body)
            .unwrap();

        self.router().oneshot(request).await.unwrap()
    }
}

/// Collect a response body as JSON
pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}
