use crate::ApiError;

use std::panic::Location;

use axum::response::IntoResponse;
use error_location::ErrorLocation;
use http::StatusCode;
use http_body_util::BodyExt;
use vh_config::ConfigError;
use vh_supervisor::SupervisorError;

async fn body_json(error: ApiError) -> (StatusCode, serde_json::Value) {
    let response = error.into_response();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_conflict_returns_409_envelope() {
    let error = ApiError::Conflict {
        message: "Server already running".into(),
        location: ErrorLocation::from(Location::caller()),
    };

    let (status, json) = body_json(error).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["status"], 409);
    assert_eq!(json["message"], "Server already running");
    assert!(json.get("result").is_none());
}

#[tokio::test]
async fn test_internal_error_returns_500_envelope() {
    let error = ApiError::Internal {
        message: "boom".into(),
        location: ErrorLocation::from(Location::caller()),
    };

    let (status, json) = body_json(error).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["status"], 500);
    assert_eq!(json["message"], "boom");
}

#[test]
fn test_already_running_converts_to_conflict() {
    let error = ApiError::from(SupervisorError::already_running());

    assert!(matches!(error, ApiError::Conflict { ref message, .. } if message == "Server already running"));
}

#[test]
fn test_already_stopped_converts_to_conflict() {
    let error = ApiError::from(SupervisorError::already_stopped());

    assert!(matches!(error, ApiError::Conflict { ref message, .. } if message == "Server already stopped"));
}

#[test]
fn test_rejected_config_converts_to_bad_request() {
    let error = ApiError::from(SupervisorError::from(ConfigError::server(
        "world must not be empty",
    )));

    assert!(matches!(error, ApiError::BadRequest { ref message, .. } if message == "world must not be empty"));
    assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
}

#[test]
fn test_unreadable_config_converts_to_internal() {
    let error = ApiError::from(SupervisorError::from(ConfigError::Io {
        path: "config.json".into(),
        source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
    }));

    assert!(matches!(error, ApiError::Internal { ref message, .. } if message.contains("config.json")));
    assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn test_startup_timeout_converts_to_internal() {
    let error = ApiError::from(SupervisorError::StartupTimeout {
        port: 2456,
        timeout_secs: 120,
        location: ErrorLocation::from(Location::caller()),
    });

    assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn test_restart_failure_converts_to_internal() {
    let error = ApiError::from(SupervisorError::restart_after_update(
        SupervisorError::internal("spawn failed"),
    ));

    assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(error.to_string().contains("failed to restart"));
}

#[test]
fn test_malformed_json_converts_to_bad_request() {
    let parse_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();

    let error = ApiError::from(parse_error);

    assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
}
