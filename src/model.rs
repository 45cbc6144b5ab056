use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::ProfileConfig;

/// Profile data as the service returns it and as it is mirrored in the cache.
///
/// Fields the core does not use are kept in `extra` so that writing the
/// record back to the cache does not drop anything the server sent.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserRecord {
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
    #[serde(flatten, skip_serializing_if = "Map::is_empty")]
    pub extra: Map<String, Value>,
}

impl UserRecord {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            ..Default::default()
        }
    }

    /// Copy of `self` with only the avatar replaced.
    #[must_use]
    pub fn with_avatar(&self, avatar: Option<String>) -> Self {
        Self {
            avatar,
            ..self.clone()
        }
    }
}

/// Transient screen state; lives as long as the screen is mounted.
#[derive(Clone, Debug, Default)]
pub struct Model {
    pub user: UserRecord,
    pub loading: bool,
    pub refreshing: bool,
    pub config: ProfileConfig,
}
