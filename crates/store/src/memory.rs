//! In-memory reference backend
//!
//! ## Design
//!
//! `MemoryStore` keeps the whole key space in a `BTreeMap` behind a
//! `parking_lot::RwLock`, with a `tokio::sync::watch` revision counter
//! as the notification primitive. Every mutation bumps the revision;
//! each reactive stream holds its own receiver and re-reads a fresh
//! snapshot per bump.
//!
//! ## Thread Safety
//!
//! `MemoryStore` is `Send + Sync` and cheap to clone (one `Arc`).
//! Lock hold times are bounded to the map operation itself; snapshots
//! are cloned out before any await point.

use crate::backend::{KeySetStream, PrimitiveStore, ValueStream};
use async_stream::stream;
use async_trait::async_trait;
use parking_lot::RwLock;
use prefstore_core::{DecodeError, PrimitiveKind, PrimitiveValue, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::trace;

/// In-memory implementation of [`PrimitiveStore`]
///
/// The reference backend: used in tests, and as the embedded store when
/// no platform engine is wired in. All data is lost on drop.
#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

struct Inner {
    map: RwLock<BTreeMap<String, PrimitiveValue>>,
    revision: watch::Sender<u64>,
}

impl Inner {
    fn bump(&self) {
        self.revision.send_modify(|r| *r += 1);
    }

    fn read(&self, key: &str, kind: PrimitiveKind) -> Result<Option<PrimitiveValue>> {
        let map = self.map.read();
        match map.get(key) {
            None => Ok(None),
            Some(stored) if stored.kind() == kind => Ok(Some(stored.clone())),
            Some(stored) => Err(DecodeError::TypeMismatch {
                expected: kind,
                actual: stored.kind(),
            }
            .into()),
        }
    }

    fn snapshot_keys(&self) -> BTreeSet<String> {
        self.map.read().keys().cloned().collect()
    }
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        let (revision, _) = watch::channel(0u64);
        MemoryStore {
            inner: Arc::new(Inner {
                map: RwLock::new(BTreeMap::new()),
                revision,
            }),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        MemoryStore::new()
    }
}

#[async_trait]
impl PrimitiveStore for MemoryStore {
    async fn put(&self, key: &str, value: PrimitiveValue) -> Result<()> {
        trace!(key, kind = %value.kind(), "put");
        self.inner.map.write().insert(key.to_string(), value);
        self.inner.bump();
        Ok(())
    }

    async fn get(&self, key: &str, kind: PrimitiveKind) -> Result<Option<PrimitiveValue>> {
        self.inner.read(key, kind)
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let removed = self.inner.map.write().remove(key).is_some();
        if removed {
            trace!(key, "remove");
            self.inner.bump();
        }
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let mut map = self.inner.map.write();
        let was_empty = map.is_empty();
        map.clear();
        drop(map);
        if !was_empty {
            trace!("clear");
            self.inner.bump();
        }
        Ok(())
    }

    async fn keys(&self) -> Result<BTreeSet<String>> {
        Ok(self.inner.snapshot_keys())
    }

    fn watch(&self, key: &str, kind: PrimitiveKind) -> ValueStream {
        let inner = self.inner.clone();
        let key = key.to_string();
        let mut rx = inner.revision.subscribe();
        Box::pin(stream! {
            let mut last: Option<Option<PrimitiveValue>> = None;
            loop {
                match inner.read(&key, kind) {
                    Ok(current) => {
                        if last.as_ref() != Some(&current) {
                            last = Some(current.clone());
                            yield Ok(current);
                        }
                    }
                    Err(e) => {
                        last = None;
                        yield Err(e);
                    }
                }
                if rx.changed().await.is_err() {
                    break;
                }
            }
        })
    }

    fn watch_keys(&self) -> KeySetStream {
        let inner = self.inner.clone();
        let mut rx = inner.revision.subscribe();
        Box::pin(stream! {
            loop {
                yield Ok(inner.snapshot_keys());
                if rx.changed().await.is_err() {
                    break;
                }
            }
        })
    }
}
