//! Aggregate extension trait
//!
//! ## Design Principle
//!
//! Extension traits layer derived, read-only views over the facade
//! without new mechanism: every method here DELEGATES to a key query
//! over the live key set. Nothing is cached or incrementally
//! maintained - each call recomputes from the current snapshot, so a
//! result can differ between calls if writes race the read (the
//! accepted weak-consistency tradeoff of the store boundary).

use crate::key_query::KeyQuery;
use async_trait::async_trait;
use prefstore_core::{validate_key, Result, Serializer};
use prefstore_store::Preferences;
use std::collections::BTreeMap;

/// Grouping, counting and existence checks over the key space
#[async_trait]
pub trait AggregateExt {
    /// Partition the key set by the substring before the first
    /// `delimiter`
    ///
    /// A key without the delimiter forms its own single-key group under
    /// the whole key - there is no shared "ungrouped" bucket.
    async fn group_by_key_prefix(
        &self,
        delimiter: char,
    ) -> Result<BTreeMap<String, Vec<String>>>;

    /// Partition the key set by an arbitrary key→group-id function
    async fn group_by_key<F>(&self, selector: F) -> Result<BTreeMap<String, Vec<String>>>
    where
        F: Fn(&str) -> String + Send + Sync;

    /// Number of keys currently present
    async fn count(&self) -> Result<usize>;

    /// Number of keys matching a wildcard pattern
    async fn count_matching(&self, pattern: &str) -> Result<usize>;

    /// Whether `key` is currently present
    async fn contains_key(&self, key: &str) -> Result<bool>;
}

#[async_trait]
impl<S: Serializer> AggregateExt for Preferences<S> {
    async fn group_by_key_prefix(
        &self,
        delimiter: char,
    ) -> Result<BTreeMap<String, Vec<String>>> {
        self.group_by_key(|key| {
            key.split(delimiter).next().unwrap_or(key).to_string()
        })
        .await
    }

    async fn group_by_key<F>(&self, selector: F) -> Result<BTreeMap<String, Vec<String>>>
    where
        F: Fn(&str) -> String + Send + Sync,
    {
        let keys = KeyQuery::new(self.store()).execute_keys().await?;
        let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for key in keys {
            groups.entry(selector(&key)).or_default().push(key);
        }
        Ok(groups)
    }

    async fn count(&self) -> Result<usize> {
        Ok(KeyQuery::new(self.store()).execute_keys().await?.len())
    }

    async fn count_matching(&self, pattern: &str) -> Result<usize> {
        Ok(KeyQuery::new(self.store())
            .matches(pattern)
            .execute_keys()
            .await?
            .len())
    }

    async fn contains_key(&self, key: &str) -> Result<bool> {
        validate_key(key)?;
        Ok(self.keys().await?.contains(key))
    }
}
