use axum::Json;
use http::StatusCode;
use serde::Serialize;

/// Successful response body: `{"status": 200, "result": ...}`.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub status: u16,
    pub result: T,
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(result: T) -> Json<Self> {
        Json(Self {
            status: StatusCode::OK.as_u16(),
            result,
        })
    }
}
