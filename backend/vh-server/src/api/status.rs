use crate::{AppState, Envelope};

use axum::{Json, extract::State};
use serde::Serialize;
use vh_supervisor::{ServerStatus, StatusSnapshot};

/// Public view of the server status; never carries the password.
#[derive(Debug, Serialize)]
pub struct StatusView {
    pub status: ServerStatus,
    pub pid: Option<u32>,
    pub name: Option<String>,
    pub port: Option<u16>,
    pub world: Option<String>,
    pub public: Option<bool>,
    pub last_error: Option<String>,
}

impl From<StatusSnapshot> for StatusView {
    fn from(snapshot: StatusSnapshot) -> Self {
        let config = snapshot.config;

        Self {
            status: snapshot.status,
            pid: snapshot.pid,
            name: config.as_ref().map(|c| c.name.clone()),
            port: config.as_ref().map(|c| c.port),
            world: config.as_ref().map(|c| c.world.clone()),
            public: config.as_ref().map(|c| c.public),
            last_error: snapshot.last_error,
        }
    }
}

/// GET /status
pub async fn status(State(state): State<AppState>) -> Json<Envelope<StatusView>> {
    Envelope::ok(StatusView::from(state.coordinator.status()))
}
