//! REST API error types
//!
//! Every failure renders as `{"status": <code>, "message": <text>}` with the
//! same status code on the response itself.

use std::panic::Location;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use error_location::ErrorLocation;
use serde::Serialize;
use thiserror::Error;
use vh_config::ConfigError;
use vh_supervisor::SupervisorError;

/// JSON error response body
#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub status: u16,
    pub message: String,
}

/// API errors with associated HTTP status codes
#[derive(Debug, Error)]
pub enum ApiError {
    /// Lifecycle transition not allowed in the current state (409)
    #[error("Conflict: {message} {location}")]
    Conflict {
        message: String,
        location: ErrorLocation,
    },

    /// Malformed request or rejected server config (400)
    #[error("Bad request: {message} {location}")]
    BadRequest {
        message: String,
        location: ErrorLocation,
    },

    /// Internal server error (500)
    #[error("Internal error: {message} {location}")]
    Internal {
        message: String,
        location: ErrorLocation,
    },
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            log::error!("{}", self);
        } else {
            log::warn!("{}", self);
        }

        let message = match self {
            ApiError::Conflict { message, .. }
            | ApiError::BadRequest { message, .. }
            | ApiError::Internal { message, .. } => message,
        };

        let body = ApiErrorBody {
            status: status.as_u16(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

/// Map lifecycle failures onto HTTP semantics
impl From<SupervisorError> for ApiError {
    #[track_caller]
    fn from(e: SupervisorError) -> Self {
        let location = ErrorLocation::from(Location::caller());

        let message = match &e {
            SupervisorError::AlreadyRunning { .. } => "Server already running".to_string(),
            SupervisorError::AlreadyStopped { .. } => "Server already stopped".to_string(),
            SupervisorError::Config {
                source: ConfigError::Generic { message, .. },
                ..
            } => message.clone(),
            other => other.to_string(),
        };

        if e.is_conflict() {
            ApiError::Conflict { message, location }
        } else if e.is_invalid_config() {
            ApiError::BadRequest { message, location }
        } else {
            ApiError::Internal { message, location }
        }
    }
}

/// Convert request body parse errors to API errors
impl From<serde_json::Error> for ApiError {
    #[track_caller]
    fn from(e: serde_json::Error) -> Self {
        ApiError::BadRequest {
            message: format!("Invalid request body: {e}"),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
