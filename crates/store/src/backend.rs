//! Primitive store boundary
//!
//! The engine treats persistence as a capability: a durable map from
//! string key to typed primitive, with atomic per-key read/write/remove/
//! clear/key-listing, observable as reactive streams. Anything providing
//! this trait can sit underneath the facade - the in-memory backend here,
//! or a platform preference store adapter.
//!
//! ## Reactivity
//!
//! `watch` and `watch_keys` emit the current snapshot immediately and
//! re-emit after mutations. Backends are allowed to re-emit more broadly
//! than strictly necessary (e.g. on any store mutation, not just the
//! watched key); consumers must tolerate over-broad re-emission.
//!
//! ## Atomicity
//!
//! Writes are atomic per key. There is no cross-key atomicity: a reader
//! iterating a key snapshot while writes race may observe a torn
//! multi-key view. That weak-consistency tradeoff is accepted for a
//! local preference store.

use async_trait::async_trait;
use futures::stream::BoxStream;
use prefstore_core::{PrimitiveKind, PrimitiveValue, Result};
use std::collections::BTreeSet;

/// Reactive stream of a single key's value (or `None` when absent)
pub type ValueStream = BoxStream<'static, Result<Option<PrimitiveValue>>>;

/// Reactive stream of the full key set
pub type KeySetStream = BoxStream<'static, Result<BTreeSet<String>>>;

/// Durable, reactive map from string key to typed primitive
///
/// All suspension in the engine happens at this boundary; everything
/// above it operates synchronously on already-fetched snapshots.
#[async_trait]
pub trait PrimitiveStore: Send + Sync + 'static {
    /// Replace the value under `key` atomically and completely
    ///
    /// Fails with a `StorageError` on backend I/O failure.
    async fn put(&self, key: &str, value: PrimitiveValue) -> Result<()>;

    /// Read the value under `key`, requiring the given kind
    ///
    /// Returns `Ok(None)` for an absent key. A stored value of a
    /// different kind fails with a `DecodeError::TypeMismatch` - a
    /// resolution failure, not a storage failure.
    async fn get(&self, key: &str, kind: PrimitiveKind) -> Result<Option<PrimitiveValue>>;

    /// Remove `key`; removing an absent key is a no-op
    async fn remove(&self, key: &str) -> Result<()>;

    /// Remove every key; idempotent
    async fn clear(&self) -> Result<()>;

    /// Snapshot of all keys currently present
    async fn keys(&self) -> Result<BTreeSet<String>>;

    /// Observe one key: emits the current value, then re-emits on change
    ///
    /// Consecutive equal values are deduplicated. Kind mismatches
    /// surface as `Err` items without terminating the stream.
    fn watch(&self, key: &str, kind: PrimitiveKind) -> ValueStream;

    /// Observe the key set: emits the current snapshot, then re-emits
    /// on every mutation
    fn watch_keys(&self) -> KeySetStream;
}
