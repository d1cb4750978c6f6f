use std::sync::Arc;

use vh_supervisor::LifecycleCoordinator;

/// Shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<LifecycleCoordinator>,
}

impl AppState {
    pub fn new(coordinator: LifecycleCoordinator) -> Self {
        Self {
            coordinator: Arc::new(coordinator),
        }
    }
}
