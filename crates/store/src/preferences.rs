//! Typed preference facade
//!
//! ## Design: STATELESS FACADE
//!
//! `Preferences` holds an `Arc<dyn PrimitiveStore>` and an optional
//! serializer - nothing else. No caches, no maps, no locks. All state
//! lives in the backend; multiple facades over the same backend are
//! safe, and cloning a facade is cheap.
//!
//! ## Typed accessors
//!
//! Primitive reads/writes go through the [`Primitive`] trait, which
//! carries the runtime kind descriptor handed to the store boundary.
//! Structured values go through the serializer boundary and are stored
//! as `String` primitives; a store built without a serializer rejects
//! them with `Error::MissingSerializer` before any I/O.

use crate::backend::PrimitiveStore;
use futures::stream::BoxStream;
use futures::StreamExt;
use prefstore_core::{
    validate_key, DecodeError, Error, JsonSerializer, Primitive, PrimitiveKind, PrimitiveValue,
    Result, Serializer,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

/// Typed handle over a primitive store
///
/// # Example
///
/// ```ignore
/// use prefstore_store::{MemoryStore, Preferences};
///
/// let prefs = Preferences::new(Arc::new(MemoryStore::new()));
/// prefs.put("age", 25i32).await?;
/// let age: Option<i32> = prefs.get("age").await?;
/// ```
pub struct Preferences<S = JsonSerializer> {
    store: Arc<dyn PrimitiveStore>,
    serializer: Option<Arc<S>>,
}

impl<S> Clone for Preferences<S> {
    fn clone(&self) -> Self {
        Preferences {
            store: self.store.clone(),
            serializer: self.serializer.clone(),
        }
    }
}

impl<S> std::fmt::Debug for Preferences<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Preferences")
            .field("has_serializer", &self.serializer.is_some())
            .finish_non_exhaustive()
    }
}

impl Preferences {
    /// Facade without a serializer: primitive accessors only
    ///
    /// Structured-value operations on this handle fail fast with
    /// `Error::MissingSerializer`.
    pub fn new(store: Arc<dyn PrimitiveStore>) -> Self {
        Preferences {
            store,
            serializer: None,
        }
    }
}

impl<S: Serializer> Preferences<S> {
    /// Facade with a serializer: primitive and structured accessors
    pub fn with_serializer(store: Arc<dyn PrimitiveStore>, serializer: S) -> Self {
        Preferences {
            store,
            serializer: Some(Arc::new(serializer)),
        }
    }

    /// Builder-style configuration
    pub fn builder() -> PreferencesBuilder<S> {
        PreferencesBuilder::new()
    }

    /// Backend handle, shared with the query layer
    pub fn store(&self) -> Arc<dyn PrimitiveStore> {
        self.store.clone()
    }

    /// Serializer handle, or `MissingSerializer` when unconfigured
    pub fn serializer(&self) -> Result<Arc<S>> {
        self.serializer.clone().ok_or(Error::MissingSerializer)
    }

    // ========== Primitive accessors ==========

    /// Store a primitive value, replacing any previous value for `key`
    pub async fn put<T: Primitive>(&self, key: &str, value: T) -> Result<()> {
        validate_key(key)?;
        self.store.put(key, value.into_primitive()).await
    }

    /// Read a primitive value; `None` when the key is absent
    pub async fn get<T: Primitive>(&self, key: &str) -> Result<Option<T>> {
        validate_key(key)?;
        match self.store.get(key, T::KIND).await? {
            Some(v) => Ok(Some(T::from_primitive(v)?)),
            None => Ok(None),
        }
    }

    /// Observe a primitive value reactively
    ///
    /// Emits the current value, then re-emits on every change.
    pub fn watch<T: Primitive>(&self, key: &str) -> Result<BoxStream<'static, Result<Option<T>>>> {
        validate_key(key)?;
        let stream = self.store.watch(key, T::KIND);
        Ok(stream
            .map(|item| match item? {
                Some(v) => Ok(Some(T::from_primitive(v)?)),
                None => Ok(None),
            })
            .boxed())
    }

    // ========== Structured accessors ==========

    /// Store a structured value through the serializer boundary
    ///
    /// To store an explicit null, pass `&None::<T>` - it encodes to the
    /// stable `"null"` sentinel and reads back as `None`.
    pub async fn put_object<T>(&self, key: &str, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        validate_key(key)?;
        let serializer = self.serializer()?;
        let encoded = serializer.encode(value)?;
        debug!(key, bytes = encoded.len(), "put encoded object");
        self.store
            .put(key, PrimitiveValue::String(encoded))
            .await
    }

    /// Read a structured value through the serializer boundary
    ///
    /// `None` for an absent key or a stored null sentinel. Decode
    /// failures propagate directly - only bulk value queries swallow.
    pub async fn get_object<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        validate_key(key)?;
        let serializer = self.serializer()?;
        match self.store.get(key, PrimitiveKind::String).await? {
            Some(stored) => Ok(serializer.decode::<Option<T>>(expect_string(&stored)?)?),
            None => Ok(None),
        }
    }

    /// Observe a structured value reactively
    pub fn watch_object<T>(&self, key: &str) -> Result<BoxStream<'static, Result<Option<T>>>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        validate_key(key)?;
        let serializer = self.serializer()?;
        let stream = self.store.watch(key, PrimitiveKind::String);
        Ok(stream
            .map(move |item| match item? {
                Some(stored) => Ok(serializer.decode::<Option<T>>(expect_string(&stored)?)?),
                None => Ok(None),
            })
            .boxed())
    }

    // ========== Key-space operations ==========

    /// Remove a key; removing an absent key is a no-op
    pub async fn remove(&self, key: &str) -> Result<()> {
        validate_key(key)?;
        self.store.remove(key).await
    }

    /// Remove every key; idempotent
    pub async fn clear(&self) -> Result<()> {
        self.store.clear().await
    }

    /// Snapshot of all keys currently present
    pub async fn keys(&self) -> Result<BTreeSet<String>> {
        self.store.keys().await
    }
}

/// Borrow the string payload of a stored primitive
///
/// Kind-checked reads make any other variant unreachable in practice;
/// still classified rather than panicking.
fn expect_string(stored: &PrimitiveValue) -> Result<&str> {
    stored.as_str().ok_or_else(|| {
        DecodeError::TypeMismatch {
            expected: PrimitiveKind::String,
            actual: stored.kind(),
        }
        .into()
    })
}

/// Fluent configuration for [`Preferences`]
///
/// The store handle is required; the serializer is optional. `build`
/// fails with `InvalidArgument` when no store was provided.
pub struct PreferencesBuilder<S = JsonSerializer> {
    store: Option<Arc<dyn PrimitiveStore>>,
    serializer: Option<S>,
}

impl<S: Serializer> PreferencesBuilder<S> {
    /// Create a builder with nothing configured
    pub fn new() -> Self {
        PreferencesBuilder {
            store: None,
            serializer: None,
        }
    }

    /// Set the backend store handle (required)
    pub fn store(mut self, store: Arc<dyn PrimitiveStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the serializer for structured values (optional)
    pub fn serializer(mut self, serializer: S) -> Self {
        self.serializer = Some(serializer);
        self
    }

    /// Build the facade
    pub fn build(self) -> Result<Preferences<S>> {
        let store = self
            .store
            .ok_or_else(|| Error::invalid_argument("a store handle is required"))?;
        Ok(Preferences {
            store,
            serializer: self.serializer.map(Arc::new),
        })
    }
}

impl<S: Serializer> Default for PreferencesBuilder<S> {
    fn default() -> Self {
        PreferencesBuilder::new()
    }
}
