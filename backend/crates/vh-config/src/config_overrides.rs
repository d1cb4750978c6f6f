use crate::ServerConfig;
use crate::server_config::deserialize_visibility;

use serde::{Deserialize, Deserializer};

/// Partial `ServerConfig` supplied with a start request.
///
/// Only the fields present in the request replace the persisted values;
/// unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConfigOverrides {
    pub name: Option<String>,
    pub password: Option<String>,
    pub port: Option<u16>,
    pub world: Option<String>,
    #[serde(deserialize_with = "deserialize_optional_visibility")]
    pub public: Option<bool>,
}

impl ConfigOverrides {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply(&self, config: &mut ServerConfig) {
        if let Some(ref name) = self.name {
            config.name = name.clone();
        }
        if let Some(ref password) = self.password {
            config.password = password.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(ref world) = self.world {
            config.world = world.clone();
        }
        if let Some(public) = self.public {
            config.public = public;
        }
    }
}

/// `null` means no override, like an absent field.
fn deserialize_optional_visibility<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Visibility(#[serde(deserialize_with = "deserialize_visibility")] bool);

    Option::<Visibility>::deserialize(deserializer).map(|public| public.map(|Visibility(v)| v))
}
