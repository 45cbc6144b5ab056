//! Local key-value cache.
//!
//! Storage itself is `crux_kv`'s `KeyValue` capability; the shell backs it with
//! whatever persistent store the platform offers. This module adds validated
//! keys and JSON-typed entries on top. Values are UTF-8 strings stored as
//! bytes; structured values are JSON.

use crux_kv::error::KeyValueError;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::marker::PhantomData;
use thiserror::Error;

pub use crux_kv::KeyValue;

pub const MAX_KEY_LENGTH: usize = 512;
pub const MAX_VALUE_SIZE: usize = 2 * 1024 * 1024;

/// What every cache round trip resolves to: the stored (or previous) bytes.
pub type CacheResult = Result<Option<Vec<u8>>, KeyValueError>;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(key: impl Into<String>) -> Result<Self, CacheError> {
        let key = key.into();
        Self::validate(&key)?;
        Ok(Self(key))
    }

    /// The key as `KeyValue` takes it.
    pub fn raw(&self) -> String {
        self.0.clone()
    }

    fn validate(key: &str) -> Result<(), CacheError> {
        if key.trim().is_empty() {
            return Err(CacheError::InvalidKey {
                key: key.to_string(),
                reason: "key cannot be empty or whitespace".to_string(),
            });
        }

        if key.len() > MAX_KEY_LENGTH {
            return Err(CacheError::InvalidKey {
                key: key.chars().take(50).collect::<String>() + "...",
                reason: format!("key exceeds maximum length of {MAX_KEY_LENGTH} bytes"),
            });
        }

        if key.chars().any(char::is_control) {
            return Err(CacheError::InvalidKey {
                key: key.escape_default().to_string(),
                reason: "key contains control characters".to_string(),
            });
        }

        Ok(())
    }
}

impl TryFrom<String> for CacheKey {
    type Error = CacheError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CacheKey> for String {
    fn from(key: CacheKey) -> Self {
        key.0
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum CacheError {
    #[error("invalid key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },

    #[error("value too large: {size} bytes exceeds maximum of {max} bytes")]
    ValueTooLarge { size: usize, max: usize },

    #[error("storage error: {0}")]
    Storage(#[from] KeyValueError),

    #[error("value under '{key}' is not UTF-8")]
    Encoding { key: String },

    #[error("serialization error: {message}")]
    Serialization { message: String },

    #[error("value under '{key}' does not have the expected shape: {message}")]
    UnexpectedShape { key: String, message: String },
}

/// Decodes stored bytes as a UTF-8 string. Absent stays absent.
pub fn decode_text(
    key: &CacheKey,
    stored: Option<Vec<u8>>,
) -> Result<Option<String>, CacheError> {
    stored
        .map(|bytes| {
            String::from_utf8(bytes).map_err(|_| CacheError::Encoding {
                key: key.to_string(),
            })
        })
        .transpose()
}

/// JSON values a loose reader treats as "nothing stored".
fn is_falsy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => true,
        serde_json::Value::Bool(b) => !b,
        serde_json::Value::Number(n) => n.as_f64() == Some(0.0),
        serde_json::Value::String(s) => s.is_empty(),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => false,
    }
}

/// A single cache slot holding a JSON-serialized `T`.
pub struct TypedEntry<T> {
    key: CacheKey,
    _phantom: PhantomData<T>,
}

impl<T: Serialize + DeserializeOwned> TypedEntry<T> {
    pub fn new(key: CacheKey) -> Self {
        Self {
            key,
            _phantom: PhantomData,
        }
    }

    pub fn key(&self) -> &CacheKey {
        &self.key
    }

    pub fn encode(&self, value: &T) -> Result<Vec<u8>, CacheError> {
        let bytes = serde_json::to_vec(value).map_err(|e| CacheError::Serialization {
            message: e.to_string(),
        })?;
        if bytes.len() > MAX_VALUE_SIZE {
            return Err(CacheError::ValueTooLarge {
                size: bytes.len(),
                max: MAX_VALUE_SIZE,
            });
        }
        Ok(bytes)
    }

    /// Reads the bytes returned by a `get`.
    ///
    /// Absent values and falsy JSON (`null`, `false`, `0`, `""`) read as
    /// `None`. Text that is not JSON at all is a `Serialization` error; JSON
    /// that does not fit `T` is `UnexpectedShape`.
    pub fn decode(&self, stored: Option<Vec<u8>>) -> Result<Option<T>, CacheError> {
        let Some(raw) = decode_text(&self.key, stored)? else {
            return Ok(None);
        };

        let value: serde_json::Value =
            serde_json::from_str(&raw).map_err(|e| CacheError::Serialization {
                message: format!("{}: {e}", self.key),
            })?;
        if is_falsy(&value) {
            return Ok(None);
        }

        serde_json::from_value(value)
            .map(Some)
            .map_err(|e| CacheError::UnexpectedShape {
                key: self.key.to_string(),
                message: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize, Deserialize, PartialEq, Debug)]
    struct Session {
        token: String,
        expires: u64,
    }

    fn session_entry() -> TypedEntry<Session> {
        TypedEntry::new(CacheKey::new("session").unwrap())
    }

    fn stored(raw: &str) -> Option<Vec<u8>> {
        Some(raw.as_bytes().to_vec())
    }

    #[test]
    fn test_key_validation_empty() {
        assert!(matches!(
            CacheKey::new(""),
            Err(CacheError::InvalidKey { .. })
        ));
    }

    #[test]
    fn test_key_validation_whitespace() {
        assert!(CacheKey::new("   ").is_err());
    }

    #[test]
    fn test_key_validation_control_chars() {
        assert!(CacheKey::new("key\x01value").is_err());
        assert!(CacheKey::new("key\0value").is_err());
    }

    #[test]
    fn test_key_validation_too_long() {
        let long_key = "a".repeat(MAX_KEY_LENGTH + 1);
        assert!(CacheKey::new(long_key).is_err());
    }

    #[test]
    fn test_key_validation_valid() {
        let key = CacheKey::new("user").unwrap();
        assert_eq!(key.raw(), "user");
        assert_eq!(key.to_string(), "user");
    }

    #[test]
    fn test_key_deserialize_validates() {
        let key: CacheKey = serde_json::from_str("\"token\"").unwrap();
        assert_eq!(key.raw(), "token");
        assert!(serde_json::from_str::<CacheKey>("\"\"").is_err());
    }

    #[test]
    fn test_storage_error_wraps_kv_error() {
        let error = CacheError::from(KeyValueError::Timeout);
        assert_eq!(error, CacheError::Storage(KeyValueError::Timeout));
        assert_eq!(error.to_string(), "storage error: timeout");
    }

    #[test]
    fn test_decode_text() {
        let key = CacheKey::new("token").unwrap();
        assert_eq!(
            decode_text(&key, stored("abc")).unwrap(),
            Some("abc".to_string())
        );
        assert_eq!(decode_text(&key, None).unwrap(), None);
        assert_eq!(
            decode_text(&key, Some(vec![0xff, 0xfe])),
            Err(CacheError::Encoding {
                key: "token".to_string()
            })
        );
    }

    #[test]
    fn test_typed_entry_decode_present() {
        let parsed = session_entry()
            .decode(stored(r#"{"token":"abc","expires":10}"#))
            .unwrap();
        assert_eq!(
            parsed,
            Some(Session {
                token: "abc".to_string(),
                expires: 10
            })
        );
    }

    #[test]
    fn test_typed_entry_decode_absent_and_falsy() {
        let entry = session_entry();
        assert_eq!(entry.decode(None).unwrap(), None);
        for raw in ["null", "false", "0", "0.0", "\"\""] {
            assert_eq!(entry.decode(stored(raw)).unwrap(), None, "{raw}");
        }
    }

    #[test]
    fn test_typed_entry_decode_malformed() {
        let result = session_entry().decode(stored("{oops"));
        assert!(matches!(result, Err(CacheError::Serialization { .. })));
    }

    #[test]
    fn test_typed_entry_decode_wrong_shape() {
        let result = session_entry().decode(stored("[1,2]"));
        assert!(matches!(result, Err(CacheError::UnexpectedShape { .. })));
    }

    #[test]
    fn test_typed_entry_encode() {
        let encoded = session_entry()
            .encode(&Session {
                token: "t".to_string(),
                expires: 1,
            })
            .unwrap();
        assert_eq!(encoded, br#"{"token":"t","expires":1}"#.to_vec());
    }

    #[test]
    fn test_typed_entry_encode_too_large() {
        let entry: TypedEntry<String> = TypedEntry::new(CacheKey::new("blob").unwrap());
        let result = entry.encode(&"x".repeat(MAX_VALUE_SIZE));
        assert!(matches!(result, Err(CacheError::ValueTooLarge { .. })));
    }
}
