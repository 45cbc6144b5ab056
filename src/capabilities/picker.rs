//! Device image library capability.
//!
//! Wire shapes follow the native picker module: options are
//! `{title, storageOptions: {skipBackup, path}}` and the response is
//! `{didCancel?, error?, uri?}`.

use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};

use crate::config::PickerConfig;

pub struct MediaPicker<E> {
    context: CapabilityContext<PickerOperation, E>,
}

impl<Ev> Capability<Ev> for MediaPicker<Ev> {
    type Operation = PickerOperation;
    type MappedSelf<MappedEv> = MediaPicker<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        MediaPicker::new(self.context.map_event(f))
    }
}

impl<E> MediaPicker<E>
where
    E: Send + 'static,
{
    pub fn new(context: CapabilityContext<PickerOperation, E>) -> Self {
        Self { context }
    }

    pub fn launch_image_library<F>(&self, options: PickerOptions, callback: F)
    where
        F: FnOnce(PickerResponse) -> E + Send + 'static,
    {
        let context = self.context.clone();
        self.context.spawn(async move {
            let response = context
                .request_from_shell(PickerOperation::LaunchImageLibrary { options })
                .await;
            context.update_app(callback(response));
        });
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum PickerOperation {
    LaunchImageLibrary { options: PickerOptions },
}

impl Operation for PickerOperation {
    type Output = PickerResponse;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StorageOptions {
    pub skip_backup: bool,
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PickerOptions {
    pub title: String,
    pub storage_options: StorageOptions,
}

impl PickerOptions {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            storage_options: StorageOptions {
                skip_backup: true,
                path: crate::config::DEFAULT_PICKER_PATH.to_string(),
            },
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.storage_options.path = path.into();
        self
    }

    pub fn with_skip_backup(mut self, skip_backup: bool) -> Self {
        self.storage_options.skip_backup = skip_backup;
        self
    }
}

impl From<&PickerConfig> for PickerOptions {
    fn from(config: &PickerConfig) -> Self {
        Self::new(config.title.clone())
            .with_path(config.path.clone())
            .with_skip_backup(config.skip_backup)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PickerResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub did_cancel: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

impl PickerResponse {
    pub fn cancelled() -> Self {
        Self {
            did_cancel: Some(true),
            ..Default::default()
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Default::default()
        }
    }

    pub fn picked(uri: impl Into<String>) -> Self {
        Self {
            uri: Some(uri.into()),
            ..Default::default()
        }
    }

    /// Cancel is checked before error; anything else counts as a pick, even
    /// without a URI.
    pub fn into_outcome(self) -> PickOutcome {
        if self.did_cancel.unwrap_or(false) {
            return PickOutcome::Cancelled;
        }
        match self.error {
            Some(error) if !error.is_empty() => PickOutcome::Failed(error),
            _ => PickOutcome::Picked(self.uri),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickOutcome {
    Cancelled,
    Failed(String),
    Picked(Option<String>),
}
