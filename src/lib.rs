//! Prefstore - embedded typed preference store with a wildcard query layer
//!
//! Prefstore keeps typed primitives (and serializer-encoded structured
//! values) under string keys and layers a lazily-evaluated query engine
//! over the key space: wildcard key matching, value-typed filtering,
//! sorting, pagination, and reactive re-execution on every store
//! mutation.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use prefstore::{AggregateExt, MemoryStore, Preferences, QueryExt};
//!
//! let prefs = Preferences::new(Arc::new(MemoryStore::new()));
//!
//! prefs.put("user_age", 25i32).await?;
//! prefs.put("user_name", "Alice".to_string()).await?;
//!
//! let ages = prefs
//!     .query_values::<i32>()
//!     .starts_with("user_")
//!     .execute()
//!     .await?;
//! assert_eq!(prefs.count().await?, 2);
//! ```
//!
//! # Architecture
//!
//! Three layers, leaf to root: `prefstore-core` (value model, error
//! taxonomy, serializer boundary), `prefstore-store` (store boundary
//! trait, in-memory backend, typed facade), `prefstore-query` (pattern
//! matcher, query builders, aggregate extensions). This crate re-exports
//! the public surface of all three.

pub use prefstore_core::{
    validate_key, DecodeError, EncodeError, Error, JsonSerializer, Primitive, PrimitiveKind,
    PrimitiveValue, Result, Serializer, StorageError,
};
pub use prefstore_query::{
    matches, AggregateExt, Entry, KeyPattern, KeyQuery, QueryExt, ValueQuery,
};
pub use prefstore_store::{
    KeySetStream, MemoryStore, Preferences, PreferencesBuilder, PrimitiveStore, ValueStream,
};
