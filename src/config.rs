//! Screen configuration.
//!
//! Everything the screen would otherwise hard-code lives here: the cache keys
//! it reads and clears, the route it navigates to on logout, the options handed
//! to the image picker and the labels shown in the view. Shells may send a
//! partial JSON document; missing fields keep their defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::capabilities::CacheKey;

pub const DEFAULT_TOKEN_KEY: &str = "token";
pub const DEFAULT_USER_KEY: &str = "user";
pub const DEFAULT_LOGIN_ROUTE: &str = "Login";
pub const DEFAULT_PICKER_PATH: &str = "images";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("config is not valid JSON: {0}")]
    Parse(String),

    #[error("invalid cache key for {field}: {reason}")]
    InvalidCacheKey { field: &'static str, reason: String },

    #[error("token and user cache keys must differ (both are '{0}')")]
    DuplicateCacheKey(String),

    #[error("{0} cannot be empty")]
    Empty(&'static str),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct CacheKeys {
    pub token: String,
    pub user: String,
}

impl Default for CacheKeys {
    fn default() -> Self {
        Self {
            token: DEFAULT_TOKEN_KEY.to_string(),
            user: DEFAULT_USER_KEY.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct PickerConfig {
    pub title: String,
    pub skip_backup: bool,
    pub path: String,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            title: "Escolha uma imagem".to_string(),
            skip_backup: true,
            path: DEFAULT_PICKER_PATH.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Labels {
    pub header_title: String,
    pub name_label: String,
    pub email_label: String,
    pub logout_label: String,
    pub error_title: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            header_title: "Seu Perfil".to_string(),
            name_label: "Nome".to_string(),
            email_label: "Email".to_string(),
            logout_label: "Sair".to_string(),
            error_title: "Erro".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct ProfileConfig {
    pub cache_keys: CacheKeys,
    pub login_route: String,
    pub picker: PickerConfig,
    pub labels: Labels,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            cache_keys: CacheKeys::default(),
            login_route: DEFAULT_LOGIN_ROUTE.to_string(),
            picker: PickerConfig::default(),
            labels: Labels::default(),
        }
    }
}

impl ProfileConfig {
    /// Parses a (possibly partial) JSON document and validates the result.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        Self::validate_key("cacheKeys.token", &self.cache_keys.token)?;
        Self::validate_key("cacheKeys.user", &self.cache_keys.user)?;

        if self.cache_keys.token == self.cache_keys.user {
            return Err(ConfigError::DuplicateCacheKey(self.cache_keys.token.clone()));
        }
        if self.login_route.trim().is_empty() {
            return Err(ConfigError::Empty("loginRoute"));
        }
        if self.picker.path.trim().is_empty() {
            return Err(ConfigError::Empty("picker.path"));
        }
        Ok(())
    }

    fn validate_key(field: &'static str, key: &str) -> Result<(), ConfigError> {
        CacheKey::new(key)
            .map(|_| ())
            .map_err(|e| ConfigError::InvalidCacheKey {
                field,
                reason: e.to_string(),
            })
    }
}
