#![forbid(unsafe_code)]

//! Byte codec for persisted appearance types.

use std::marker::PhantomData;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::CodecError;

/// Converts an appearance type to and from its persisted bytes.
///
/// `encode` failing is a programming error in the application (every
/// appearance type must be encodable) and is treated as fatal by the
/// [`Designer`](crate::designer::Designer). `decode` must never fail
/// loudly: malformed input yields `None` and the store falls back to the
/// default appearance type.
pub trait AppearanceCodec<T> {
    fn encode(&self, value: &T) -> Result<Vec<u8>, CodecError>;

    fn decode(&self, bytes: &[u8]) -> Option<T>;
}

/// JSON codec backed by `serde_json`.
///
/// A fieldless enum with `#[serde(rename_all = "lowercase")]` is stored as
/// `"dark"`, including the quotes.
pub struct JsonCodec<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonCodec<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for JsonCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for JsonCodec<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for JsonCodec<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("JsonCodec")
    }
}

impl<T: Serialize + DeserializeOwned> AppearanceCodec<T> for JsonCodec<T> {
    fn encode(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        Ok(serde_json::to_vec(value)?)
    }

    fn decode(&self, bytes: &[u8]) -> Option<T> {
        serde_json::from_slice(bytes).ok()
    }
}
