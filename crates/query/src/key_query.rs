//! Key query builder
//!
//! Filters, sorts and paginates the key space only - values are never
//! resolved. Chained calls accumulate plan state by value (each call
//! consumes and returns the builder), so a query is built in one
//! expression and no aliasing is possible.
//!
//! Execution is a pure projection over a snapshot: the pipeline order
//! is fixed as filter → sort → skip → take. Sorting before pagination
//! is what makes pagination deterministic; the order is a correctness
//! contract, not an optimization detail.

use crate::pattern::KeyPattern;
use crate::plan::{KeyFilter, KeyFilters, Page};
use async_stream::stream;
use futures::stream::BoxStream;
use futures::StreamExt;
use prefstore_core::Result;
use prefstore_store::PrimitiveStore;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

/// Lazily-evaluated query over the key space
///
/// # Example
///
/// ```ignore
/// let keys = prefs
///     .query_keys()
///     .starts_with("user_")
///     .skip(10)
///     .take(10)
///     .execute_keys()
///     .await?;
/// ```
#[derive(Clone)]
pub struct KeyQuery {
    store: Arc<dyn PrimitiveStore>,
    filters: KeyFilters,
    page: Page,
    descending: bool,
}

impl KeyQuery {
    /// New query over a store handle; matches every key until filtered
    pub fn new(store: Arc<dyn PrimitiveStore>) -> Self {
        KeyQuery {
            store,
            filters: KeyFilters::default(),
            page: Page::default(),
            descending: false,
        }
    }

    // ========== Filters (AND-combined, registration order) ==========

    /// Keep keys starting with `prefix`
    pub fn starts_with(mut self, prefix: impl Into<String>) -> Self {
        self.filters.push(KeyFilter::StartsWith(prefix.into()));
        self
    }

    /// Keep keys ending with `suffix`
    pub fn ends_with(mut self, suffix: impl Into<String>) -> Self {
        self.filters.push(KeyFilter::EndsWith(suffix.into()));
        self
    }

    /// Keep keys containing `needle`
    pub fn contains(mut self, needle: impl Into<String>) -> Self {
        self.filters.push(KeyFilter::Contains(needle.into()));
        self
    }

    /// Keep keys matching a wildcard pattern (see [`KeyPattern`])
    pub fn matches(mut self, pattern: &str) -> Self {
        self.filters.push(KeyFilter::Pattern(KeyPattern::parse(pattern)));
        self
    }

    /// Keep keys satisfying an arbitrary predicate
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.filters.push(KeyFilter::Predicate(Arc::new(predicate)));
        self
    }

    // ========== Pagination ==========

    /// Drop the first `n` keys of the sorted result
    pub fn skip(mut self, n: usize) -> Self {
        self.page.skip(n);
        self
    }

    /// Keep at most `n` keys after skipping
    pub fn take(mut self, n: usize) -> Self {
        self.page.take(n);
        self
    }

    // ========== Sort ==========

    /// Sort lexicographically ascending by code point (the default)
    pub fn sort_by_key_ascending(mut self) -> Self {
        self.descending = false;
        self
    }

    /// Sort lexicographically descending by code point
    pub fn sort_by_key_descending(mut self) -> Self {
        self.descending = true;
        self
    }

    // ========== Execution ==========

    /// Run the pipeline once over the current key snapshot
    pub async fn execute_keys(&self) -> Result<Vec<String>> {
        let snapshot = self.store.keys().await?;
        Ok(self.select(snapshot))
    }

    /// Run the pipeline on every emission of the key-set stream
    ///
    /// Each emission is an independent pass over the then-current
    /// snapshot; results may change non-monotonically if the store is
    /// mutated between passes. Dropping the stream cancels observation.
    pub fn observe_keys(&self) -> BoxStream<'static, Result<Vec<String>>> {
        let query = self.clone();
        let mut snapshots = self.store.watch_keys();
        Box::pin(stream! {
            while let Some(snapshot) = snapshots.next().await {
                yield snapshot.map(|keys| query.select(keys));
            }
        })
    }

    /// Fixed pipeline: filter → sort → skip → take
    ///
    /// The snapshot arrives key-ascending (`BTreeSet` iteration order),
    /// so sorting is a direction choice, not a re-sort.
    pub(crate) fn select(&self, snapshot: BTreeSet<String>) -> Vec<String> {
        let total = snapshot.len();
        let mut keys: Vec<String> = snapshot
            .into_iter()
            .filter(|key| self.filters.accepts(key))
            .collect();
        if self.descending {
            keys.reverse();
        }
        let keys = self.page.apply(keys);
        debug!(total, selected = keys.len(), "key query pass");
        keys
    }
}
