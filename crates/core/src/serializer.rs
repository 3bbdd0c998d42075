//! Serializer boundary
//!
//! Structured values reach the store as opaque encoded strings. The
//! [`Serializer`] trait is the only place that knows how; the query layer
//! and store facade treat the payloads as uninterpreted `String`
//! primitives.
//!
//! The type parameter on `encode`/`decode` is the structured-type
//! descriptor: callers pick the codec by monomorphizing on `T`, and
//! nested containers (vectors, maps, structs of structs) come along for
//! free from serde.
//!
//! ## Null
//!
//! `null` has a stable encoding: `Option::<T>::None` encodes to the
//! literal string `"null"` and decodes back to `None`. An absent key and
//! a stored null are therefore distinguishable at the store but collapse
//! to `None` at the typed surface.
//!
//! Implementations must be safe for concurrent use across keys;
//! [`JsonSerializer`] is stateless, which satisfies this trivially.

use crate::error::{DecodeError, EncodeError};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Stable encoding of the null sentinel
pub const NULL: &str = "null";

/// Converts between structured values and their string encodings
///
/// Failures are always classified - [`EncodeError`] / [`DecodeError`]
/// carrying the original cause - so callers can tell bad stored data
/// from a misconfigured serializer.
pub trait Serializer: Send + Sync + 'static {
    /// Encode a value into its string form
    fn encode<T>(&self, value: &T) -> Result<String, EncodeError>
    where
        T: Serialize + ?Sized;

    /// Decode a stored string back into a value
    fn decode<T>(&self, raw: &str) -> Result<T, DecodeError>
    where
        T: DeserializeOwned;
}

/// JSON implementation of the serializer boundary
///
/// The default codec. Stateless; cloning or sharing across tasks is free.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer;

impl Serializer for JsonSerializer {
    fn encode<T>(&self, value: &T) -> Result<String, EncodeError>
    where
        T: Serialize + ?Sized,
    {
        serde_json::to_string(value).map_err(EncodeError::new)
    }

    fn decode<T>(&self, raw: &str) -> Result<T, DecodeError>
    where
        T: DeserializeOwned,
    {
        serde_json::from_str(raw).map_err(DecodeError::malformed)
    }
}
