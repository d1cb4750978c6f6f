use crate::{DEFAULT_HTTP_HOST, DEFAULT_HTTP_PORT};

use serde::Deserialize;

/// Where the warden's HTTP API listens.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    pub host: String,
    pub port: u16,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            host: String::from(DEFAULT_HTTP_HOST),
            port: DEFAULT_HTTP_PORT,
        }
    }
}
