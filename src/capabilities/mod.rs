mod alert;
mod api;
mod cache;
mod picker;
mod router;

pub use self::alert::{Alert, AlertOperation};
pub use self::api::{ApiOperation, CheckTokenResponse, ProfileApi, TokenCheck};
pub use self::cache::{
    decode_text, CacheError, CacheKey, CacheResult, KeyValue, TypedEntry, MAX_KEY_LENGTH,
    MAX_VALUE_SIZE,
};
pub use self::picker::{
    MediaPicker, PickOutcome, PickerOperation, PickerOptions, PickerResponse, StorageOptions,
};
pub use self::router::{Router, RouterOperation};
pub use crux_kv::error::KeyValueError;

// Crux's built-in Render covers view updates; no wrapper needed.
pub use crux_core::render::Render;

// The Effect derive refers to `App` and `Event` by name.
#[allow(unused_imports)]
use crate::app::App;
use crate::event::Event;

#[derive(crux_core::macros::Effect)]
pub struct Capabilities {
    pub render: Render<Event>,
    pub cache: KeyValue<Event>,
    pub api: ProfileApi<Event>,
    pub picker: MediaPicker<Event>,
    pub router: Router<Event>,
    pub alert: Alert<Event>,
}
