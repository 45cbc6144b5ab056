use serde::{Deserialize, Serialize};

use crate::capabilities::{CacheResult, CheckTokenResponse, PickerResponse};
use crate::config::ProfileConfig;

// --- Event enum: large variants boxed ---

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum Event {
    // Lifecycle
    Configure(Box<ProfileConfig>),
    Mounted,

    // User actions
    RefreshRequested,
    AvatarTapped,
    LogoutTapped,

    // Capability responses
    CachedUserLoaded(Box<CacheResult>),
    TokenLoaded(Box<CacheResult>),
    TokenChecked(Box<CheckTokenResponse>),
    UserPersisted(Box<CacheResult>),
    AvatarPicked(Box<PickerResponse>),
    TokenRemoved(Box<CacheResult>),
    UserRemoved(Box<CacheResult>),
}

impl Event {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Configure(_) => "configure",
            Self::Mounted => "mounted",
            Self::RefreshRequested => "refresh_requested",
            Self::AvatarTapped => "avatar_tapped",
            Self::LogoutTapped => "logout_tapped",
            Self::CachedUserLoaded(_) => "cached_user_loaded",
            Self::TokenLoaded(_) => "token_loaded",
            Self::TokenChecked(_) => "token_checked",
            Self::UserPersisted(_) => "user_persisted",
            Self::AvatarPicked(_) => "avatar_picked",
            Self::TokenRemoved(_) => "token_removed",
            Self::UserRemoved(_) => "user_removed",
        }
    }

    #[must_use]
    pub const fn is_user_initiated(&self) -> bool {
        matches!(
            self,
            Self::RefreshRequested | Self::AvatarTapped | Self::LogoutTapped
        )
    }
}
