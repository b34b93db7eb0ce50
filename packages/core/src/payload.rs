//! Payload encoding between typed handlers and the container.
//!
//! Containers move payloads and results around as `serde_json::Value`.
//! Typed code only ever sees its own types: anything that round-trips
//! through a JSON value is a payload, and [`NoPayload`] marks handlers that
//! take none.
//!
//! Values JSON cannot represent are rejected when they are encoded. A
//! non-finite `f64`, for one, would otherwise turn into `null` and only fail
//! once the receiving side tried to decode it.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::{Error, Result};

/// Marker for mutations and actions that take no payload.
///
/// This type deliberately does not implement `Serialize`, which keeps the
/// `*_with` accessor methods unavailable for no-payload handlers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoPayload;

/// A value that can travel to a mutation or action handler.
pub trait Payload: Sized + Send + 'static {
    /// Convert into the container representation. `None` means "no payload".
    fn encode(self, key: &str) -> Result<Option<Value>>;

    /// Rebuild from the container representation.
    fn decode(value: Option<Value>, key: &str) -> Result<Self>;
}

impl Payload for NoPayload {
    fn encode(self, _key: &str) -> Result<Option<Value>> {
        Ok(None)
    }

    fn decode(_value: Option<Value>, _key: &str) -> Result<Self> {
        Ok(NoPayload)
    }
}

impl<T: Serialize + DeserializeOwned + Send + 'static> Payload for T {
    fn encode(self, key: &str) -> Result<Option<Value>> {
        encode_value(&self, key).map(Some)
    }

    fn decode(value: Option<Value>, key: &str) -> Result<Self> {
        decode_value(value.unwrap_or(Value::Null), key)
    }
}

/// Serialize a value for the container.
///
/// Fails with `Error::Encode` unless the value decodes back into `T`.
pub fn encode_value<T: Serialize + DeserializeOwned>(data: &T, key: &str) -> Result<Value> {
    let encode_error = |source| Error::Encode {
        key: key.to_string(),
        source,
    };
    let value = serde_json::to_value(data).map_err(encode_error)?;
    T::deserialize(&value).map_err(encode_error)?;
    Ok(value)
}

/// Deserialize a container value.
pub fn decode_value<T: DeserializeOwned>(value: Value, key: &str) -> Result<T> {
    serde_json::from_value(value).map_err(|source| Error::Decode {
        key: key.to_string(),
        source,
    })
}
