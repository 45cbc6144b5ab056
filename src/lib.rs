// lib.rs - Profile screen shared core

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! Shared core for the profile screen.
//!
//! The screen shows the signed-in user's cached profile, lets the user pull to
//! refresh it from the profile service, pick a new avatar from the device
//! library and log out. All platform work goes through capabilities; the shell
//! renders the [`ViewModel`] and resolves the [`Effect`]s.

pub mod app;
pub mod capabilities;
pub mod config;
pub mod event;
pub mod model;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use app::App;
pub use capabilities::{CacheError, CacheKey, Capabilities, Effect};
pub use config::{ConfigError, ProfileConfig};
pub use crux_core::{render::Render, App as CruxApp};
pub use event::Event;
pub use model::{Model, UserRecord};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProfileError {
    #[error("cached value under '{key}' is not a valid user record: {message}")]
    CorruptCache { key: String, message: String },

    #[error("local cache failure: {0}")]
    Storage(#[from] CacheError),

    #[error("profile service returned neither an error nor a user")]
    EmptyApiResponse,

    #[error("image picker failed: {0}")]
    Picker(String),
}

impl ProfileError {
    /// Undecodable bytes or text that is not JSON mean the stored value is
    /// bad, everything else passes through as a cache failure.
    #[must_use]
    pub fn from_cache(key: &CacheKey, error: CacheError) -> Self {
        match error {
            CacheError::Serialization { message } => Self::CorruptCache {
                key: key.to_string(),
                message,
            },
            CacheError::Encoding { .. } => Self::CorruptCache {
                key: key.to_string(),
                message: "not UTF-8".to_string(),
            },
            other => Self::Storage(other),
        }
    }
}

pub type ProfileResult<T> = Result<T, ProfileError>;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ViewModel {
    pub header_title: String,
    pub avatar_uri: Option<String>,
    pub name_line: String,
    pub email_line: String,
    pub logout_label: String,
    pub loading: bool,
    pub refreshing: bool,
}

impl From<&Model> for ViewModel {
    fn from(model: &Model) -> Self {
        let labels = &model.config.labels;
        Self {
            header_title: labels.header_title.clone(),
            avatar_uri: model.user.avatar.clone(),
            name_line: format!("{}: {}", labels.name_label, model.user.name),
            email_line: format!("{}: {}", labels.email_label, model.user.email),
            logout_label: labels.logout_label.clone(),
            loading: model.loading,
            refreshing: model.refreshing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::KeyValueError;

    mod error_tests {
        use super::*;

        #[test]
        fn test_serialization_maps_to_corrupt_cache() {
            let key = CacheKey::new("user").unwrap();
            let error = ProfileError::from_cache(
                &key,
                CacheError::Serialization {
                    message: "expected value".to_string(),
                },
            );
            assert_eq!(
                error,
                ProfileError::CorruptCache {
                    key: "user".to_string(),
                    message: "expected value".to_string(),
                }
            );
        }

        #[test]
        fn test_storage_failure_passes_through() {
            let key = CacheKey::new("token").unwrap();
            let cause = CacheError::Storage(KeyValueError::Io {
                message: "denied".to_string(),
            });
            let error = ProfileError::from_cache(&key, cause.clone());
            assert_eq!(error, ProfileError::Storage(cause));
        }

        #[test]
        fn test_display() {
            assert_eq!(
                ProfileError::Picker("no access".to_string()).to_string(),
                "image picker failed: no access"
            );
        }
    }

    mod view_tests {
        use super::*;

        #[test]
        fn test_default_view() {
            let view = ViewModel::from(&Model::default());
            assert_eq!(view.header_title, "Seu Perfil");
            assert_eq!(view.name_line, "Nome: ");
            assert_eq!(view.email_line, "Email: ");
            assert_eq!(view.logout_label, "Sair");
            assert_eq!(view.avatar_uri, None);
            assert!(!view.loading);
            assert!(!view.refreshing);
        }

        #[test]
        fn test_view_reflects_user_and_labels() {
            let mut model = Model::default();
            model.user = UserRecord::new("Ana", "ana@example.com")
                .with_avatar(Some("file://ana.png".to_string()));
            model.config.labels.name_label = "Name".to_string();
            model.refreshing = true;

            let view = ViewModel::from(&model);
            assert_eq!(view.name_line, "Name: Ana");
            assert_eq!(view.email_line, "Email: ana@example.com");
            assert_eq!(view.avatar_uri.as_deref(), Some("file://ana.png"));
            assert!(view.refreshing);
        }
    }
}
