//! Lifecycle REST API handlers
//!
//! Each handler funnels through the coordinator's gate; concurrent requests
//! are served one after another in arrival order.

use crate::{ApiResult, AppState, Envelope};

use axum::{
    Json,
    body::{Body, Bytes},
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use futures::StreamExt;
use log::info;
use vh_config::ConfigOverrides;
use vh_supervisor::SupervisorError;

/// POST /start
///
/// Start the server. The body may carry any subset of the config fields;
/// an empty body starts with the persisted config. A running server answers
/// 409 even when the body is malformed.
pub async fn start(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Json<Envelope<&'static str>>> {
    let overrides = match parse_overrides(&body) {
        Ok(overrides) => overrides,
        Err(_) if state.coordinator.status().is_running() => {
            return Err(SupervisorError::already_running().into());
        }
        Err(e) => return Err(e),
    };
    if !overrides.is_empty() {
        info!("Start requested with overrides {overrides:?}");
    }

    state.coordinator.start(overrides).await?;
    Ok(Envelope::ok("Started server"))
}

pub(crate) fn parse_overrides(body: &[u8]) -> ApiResult<ConfigOverrides> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ConfigOverrides::default());
    }

    Ok(serde_json::from_slice(body)?)
}

/// POST /stop
pub async fn stop(State(state): State<AppState>) -> ApiResult<Json<Envelope<&'static str>>> {
    state.coordinator.stop().await?;
    Ok(Envelope::ok("Server stopped"))
}

/// GET /backup
///
/// Stream a zip of the worlds directory. A running server is stopped for the
/// duration of the backup and restarted once the last byte is sent.
pub async fn backup(State(state): State<AppState>) -> ApiResult<Response> {
    let chunks = state.coordinator.backup().await?;

    let disposition = format!(
        "attachment; filename=\"worlds-{}.zip\"",
        Utc::now().format("%Y%m%dT%H%M%SZ")
    );
    let body = Body::from_stream(chunks.map(|chunk| chunk.map_err(std::io::Error::other)));

    Ok((
        [
            (header::CONTENT_TYPE, String::from("application/zip")),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}

/// POST /update
pub async fn update(State(state): State<AppState>) -> ApiResult<Json<Envelope<&'static str>>> {
    state.coordinator.update().await?;
    Ok(Envelope::ok("Server updated"))
}
