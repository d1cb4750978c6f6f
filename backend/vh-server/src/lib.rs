pub mod api;
pub mod app_state;
pub mod error;
pub mod logger;
pub mod routes;

#[cfg(test)]
mod tests;

pub use api::{
    envelope::Envelope,
    error::ApiError,
    error::ApiErrorBody,
    error::Result as ApiResult,
    lifecycle::{self, backup, start, stop, update},
    status::{self, StatusView},
    worlds::{self, list_worlds},
};
pub use app_state::AppState;

pub use crate::routes::build_router;
