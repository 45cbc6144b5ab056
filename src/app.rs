//! Profile screen update loop.
//!
//! Each user action is a short chain of capability round trips:
//!
//! - mount: read `user` from the cache
//! - refresh: read `token`, check it with the service, write `user` back
//! - avatar: open the image library, keep the pick in view state
//! - logout: remove `token`, remove `user`, navigate to the login route
//!
//! Actions are not guarded against each other. A logout started while a
//! refresh is in flight races it on the cache and the last write wins.

use tracing::{debug, error, info, warn};

use crate::capabilities::{
    decode_text, CacheError, CacheKey, CacheResult, Capabilities, PickOutcome, PickerOptions,
    TokenCheck, TypedEntry,
};
use crate::event::Event;
use crate::model::{Model, UserRecord};
use crate::{ProfileError, ProfileResult, ViewModel};

#[derive(Default)]
pub struct App;

impl App {
    fn token_key(model: &Model) -> ProfileResult<CacheKey> {
        Ok(CacheKey::new(model.config.cache_keys.token.as_str())?)
    }

    fn user_entry(model: &Model) -> ProfileResult<TypedEntry<UserRecord>> {
        let key = CacheKey::new(model.config.cache_keys.user.as_str())?;
        Ok(TypedEntry::new(key))
    }

    /// `Ok(None)` means nothing usable is cached and the default record stays.
    fn read_cached_user(model: &Model, result: CacheResult) -> ProfileResult<Option<UserRecord>> {
        let entry = Self::user_entry(model)?;
        let stored = result.map_err(CacheError::from)?;
        match entry.decode(stored) {
            Ok(user) => Ok(user),
            Err(CacheError::UnexpectedShape { message, .. }) => {
                warn!(
                    key = %entry.key(),
                    error = %message,
                    "ignoring cached user of unexpected shape"
                );
                Ok(None)
            }
            Err(e) => Err(ProfileError::from_cache(entry.key(), e)),
        }
    }

    fn read_token(model: &Model, result: CacheResult) -> ProfileResult<Option<String>> {
        let key = Self::token_key(model)?;
        let stored = result.map_err(CacheError::from)?;
        Ok(decode_text(&key, stored)?)
    }

    fn finish_refresh(model: &mut Model, caps: &Capabilities) {
        model.refreshing = false;
        caps.render.render();
    }

    fn persist_user(model: &mut Model, caps: &Capabilities) {
        let persisted = Self::user_entry(model).and_then(|entry| {
            let json = entry.encode(&model.user)?;
            Ok((entry, json))
        });

        match persisted {
            Ok((entry, json)) => {
                debug!(key = %entry.key(), bytes = json.len(), "writing user to cache");
                caps.cache.set(entry.key().raw(), json, |result| {
                    Event::UserPersisted(Box::new(result))
                });
            }
            Err(e) => {
                error!(error = %e, "could not write refreshed user to cache");
                Self::finish_refresh(model, caps);
            }
        }
    }

    fn remove_user(model: &Model, caps: &Capabilities) {
        match Self::user_entry(model) {
            Ok(entry) => {
                caps.cache
                    .delete(entry.key().raw(), |result| Event::UserRemoved(Box::new(result)));
            }
            Err(e) => error!(error = %e, "logout aborted before removing user"),
        }
    }
}

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = ViewModel;
    type Capabilities = Capabilities;

    #[allow(clippy::too_many_lines)]
    fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
        let event_name = event.name();
        if event.is_user_initiated() {
            info!(event = event_name, "user action");
        } else {
            debug!(event = event_name, "handling event");
        }

        match event {
            Event::Configure(config) => match config.validate() {
                Ok(()) => {
                    model.config = *config;
                    caps.render.render();
                }
                Err(e) => warn!(error = %e, "ignoring invalid profile config"),
            },

            Event::Mounted => {
                model.loading = true;
                caps.render.render();

                match Self::user_entry(model) {
                    Ok(entry) => {
                        caps.cache.get(entry.key().raw(), |result| {
                            Event::CachedUserLoaded(Box::new(result))
                        });
                    }
                    Err(e) => error!(error = %e, "cannot read cached user"),
                }
            }

            Event::CachedUserLoaded(result) => match Self::read_cached_user(model, *result) {
                Ok(cached) => {
                    if let Some(user) = cached {
                        model.user = user;
                    } else {
                        debug!("no cached user, keeping empty profile");
                    }
                    model.loading = false;
                    caps.render.render();
                }
                // The load never completes: the record is left as it was and
                // `loading` stays set.
                Err(e) => error!(error = %e, "failed to load cached user"),
            },

            Event::RefreshRequested => {
                model.refreshing = true;
                caps.render.render();

                match Self::token_key(model) {
                    Ok(key) => {
                        caps.cache
                            .get(key.raw(), |result| Event::TokenLoaded(Box::new(result)));
                    }
                    Err(e) => {
                        error!(error = %e, "cannot read token for refresh");
                        Self::finish_refresh(model, caps);
                    }
                }
            }

            Event::TokenLoaded(result) => match Self::read_token(model, *result) {
                Ok(token) => {
                    if token.is_none() {
                        warn!("no cached token, checking anyway");
                    }
                    caps.api
                        .check_token(token, |response| Event::TokenChecked(Box::new(response)));
                }
                Err(e) => {
                    error!(error = %e, "failed to read token");
                    Self::finish_refresh(model, caps);
                }
            },

            Event::TokenChecked(response) => match (*response).into_check() {
                TokenCheck::Rejected(message) => {
                    warn!(error = %message, "profile service rejected token");
                    caps.alert
                        .show(model.config.labels.error_title.clone(), message);
                    Self::finish_refresh(model, caps);
                }
                TokenCheck::Verified(user) => {
                    model.user = user;
                    caps.render.render();
                    Self::persist_user(model, caps);
                }
                TokenCheck::Empty => {
                    let e = ProfileError::EmptyApiResponse;
                    warn!(error = %e, "refresh ignored");
                    Self::finish_refresh(model, caps);
                }
            },

            Event::UserPersisted(result) => {
                if let Err(e) = *result {
                    let e = ProfileError::Storage(e.into());
                    error!(error = %e, "failed to cache refreshed user");
                }
                Self::finish_refresh(model, caps);
            }

            Event::AvatarTapped => {
                let options = PickerOptions::from(&model.config.picker);
                caps.picker.launch_image_library(options, |response| {
                    Event::AvatarPicked(Box::new(response))
                });
            }

            Event::AvatarPicked(response) => match (*response).into_outcome() {
                PickOutcome::Cancelled => info!("image selection cancelled"),
                PickOutcome::Failed(message) => {
                    let e = ProfileError::Picker(message);
                    error!(error = %e, "image selection failed");
                }
                PickOutcome::Picked(uri) => {
                    model.user = model.user.with_avatar(uri);
                    // Known gap: the avatar is neither uploaded nor cached, so
                    // the next refresh or restart drops it.
                    warn!("avatar changed in view state only");
                    caps.render.render();
                }
            },

            Event::LogoutTapped => match Self::token_key(model) {
                Ok(key) => {
                    caps.cache
                        .delete(key.raw(), |result| Event::TokenRemoved(Box::new(result)));
                }
                Err(e) => error!(error = %e, "logout aborted before removing token"),
            },

            Event::TokenRemoved(result) => match *result {
                Ok(_) => Self::remove_user(model, caps),
                Err(e) => {
                    let e = ProfileError::Storage(e.into());
                    error!(error = %e, "logout failed removing token");
                }
            },

            Event::UserRemoved(result) => match *result {
                Ok(_) => {
                    let route = model.config.login_route.clone();
                    info!(route = %route, "logged out");
                    caps.router.navigate(route);
                }
                Err(e) => {
                    let e = ProfileError::Storage(e.into());
                    error!(error = %e, "logout failed removing user");
                }
            },
        }
    }

    fn view(&self, model: &Model) -> ViewModel {
        ViewModel::from(model)
    }
}
