//! Value query builder
//!
//! Extends the key-filter surface of [`KeyQuery`](crate::KeyQuery) with
//! value resolution: every key surviving the key filters is resolved to
//! a typed value - through the primitive accessor for primitive types,
//! or through the serializer boundary for structured types - and the
//! surviving `(key, value)` entries are filtered, sorted and paginated.
//!
//! ## Pipeline
//!
//! Fixed order per pass: key-filter + resolve (key filters are cheap
//! and prune before resolution is paid for) → value-filter → sort →
//! skip → take. All output projections derive from the one canonical
//! ordered entry sequence.
//!
//! ## Error policy
//!
//! Resolution failures - malformed stored data, or a kind mismatch
//! against what is actually stored - are swallowed by default: the key
//! is excluded and the query returns the remaining entries. That
//! default favors usable partial results over total failure on a store
//! with some corrupt entries; each exclusion is warn-logged.
//! [`ValueQuery::fail_on_error`] opts into strict mode, where the first
//! resolution failure aborts the query with the underlying error.
//! Storage failures always abort, in both modes.

use crate::pattern::KeyPattern;
use crate::plan::{KeyFilter, KeyFilters, Page};
use async_stream::stream;
use futures::future::BoxFuture;
use futures::stream::BoxStream;
use futures::StreamExt;
use prefstore_core::{
    DecodeError, Error, Primitive, PrimitiveKind, PrimitiveValue, Result, Serializer,
};
use prefstore_store::{Preferences, PrimitiveStore};
use regex::Regex;
use serde::de::DeserializeOwned;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::{debug, warn};

/// A resolved (key, value) pair in a value query's result pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct Entry<T> {
    /// Key the value was resolved from
    pub key: String,
    /// Resolved typed value
    pub value: T,
}

type ValueResolver<T> = Arc<dyn Fn(String) -> BoxFuture<'static, Result<Option<T>>> + Send + Sync>;
type ValuePredicate<T> = Arc<dyn Fn(&str, &T) -> bool + Send + Sync>;
type ValueComparator<T> = Arc<dyn Fn(&T, &T) -> Ordering + Send + Sync>;

/// Active sort axis - setting one clears the other, last write wins
enum SortAxis<T> {
    KeyAscending,
    KeyDescending,
    Value {
        comparator: ValueComparator<T>,
        descending: bool,
    },
}

impl<T> Clone for SortAxis<T> {
    fn clone(&self) -> Self {
        match self {
            SortAxis::KeyAscending => SortAxis::KeyAscending,
            SortAxis::KeyDescending => SortAxis::KeyDescending,
            SortAxis::Value {
                comparator,
                descending,
            } => SortAxis::Value {
                comparator: comparator.clone(),
                descending: *descending,
            },
        }
    }
}

/// Lazily-evaluated query resolving keys to typed values
///
/// Built from the facade via
/// [`QueryExt::query_values`](crate::QueryExt::query_values) (primitive
/// types) or [`QueryExt::query_objects`](crate::QueryExt::query_objects)
/// (structured types).
pub struct ValueQuery<T> {
    store: Arc<dyn PrimitiveStore>,
    resolver: ValueResolver<T>,
    filters: KeyFilters,
    value_filters: Vec<ValuePredicate<T>>,
    sort: SortAxis<T>,
    page: Page,
    fail_on_error: bool,
}

impl<T> Clone for ValueQuery<T> {
    fn clone(&self) -> Self {
        ValueQuery {
            store: self.store.clone(),
            resolver: self.resolver.clone(),
            filters: self.filters.clone(),
            value_filters: self.value_filters.clone(),
            sort: self.sort.clone(),
            page: self.page,
            fail_on_error: self.fail_on_error,
        }
    }
}

impl<T> std::fmt::Debug for ValueQuery<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValueQuery")
            .field("fail_on_error", &self.fail_on_error)
            .finish_non_exhaustive()
    }
}

impl<T: Send + 'static> ValueQuery<T> {
    fn with_resolver(store: Arc<dyn PrimitiveStore>, resolver: ValueResolver<T>) -> Self {
        ValueQuery {
            store,
            resolver,
            filters: KeyFilters::default(),
            value_filters: Vec::new(),
            sort: SortAxis::KeyAscending,
            page: Page::default(),
            fail_on_error: false,
        }
    }

    /// Query resolving through the typed primitive accessor
    pub fn primitives(store: Arc<dyn PrimitiveStore>) -> Self
    where
        T: Primitive,
    {
        let resolve_store = store.clone();
        let resolver: ValueResolver<T> = Arc::new(move |key: String| {
            let store = resolve_store.clone();
            Box::pin(async move {
                match store.get(&key, T::KIND).await? {
                    Some(value) => Ok(Some(T::from_primitive(value)?)),
                    None => Ok(None),
                }
            })
        });
        ValueQuery::with_resolver(store, resolver)
    }

    /// Query resolving through the serializer boundary
    ///
    /// Fails fast with `Error::MissingSerializer` when the facade was
    /// built without one - a configuration error surfaced before any
    /// I/O, never during iteration.
    pub fn objects<S: Serializer>(prefs: &Preferences<S>) -> Result<Self>
    where
        T: DeserializeOwned,
    {
        let serializer = prefs.serializer()?;
        let store = prefs.store();
        let resolve_store = store.clone();
        let resolver: ValueResolver<T> = Arc::new(move |key: String| {
            let store = resolve_store.clone();
            let serializer = serializer.clone();
            Box::pin(async move {
                match store.get(&key, PrimitiveKind::String).await? {
                    Some(PrimitiveValue::String(raw)) => {
                        Ok(serializer.decode::<Option<T>>(&raw)?)
                    }
                    Some(other) => Err(DecodeError::TypeMismatch {
                        expected: PrimitiveKind::String,
                        actual: other.kind(),
                    }
                    .into()),
                    None => Ok(None),
                }
            })
        });
        Ok(ValueQuery::with_resolver(store, resolver))
    }

    // ========== Key filters (same surface as KeyQuery) ==========

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

    /// Keep keys matching a wildcard pattern
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

    // ========== Value filters ==========

    /// Keep entries satisfying a predicate over key and resolved value
    ///
    /// Evaluated only for keys that passed all key filters and whose
    /// value resolved successfully. AND-combined in registration order.
    pub fn filter_value<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&str, &T) -> bool + Send + Sync + 'static,
    {
        self.value_filters.push(Arc::new(predicate));
        self
    }

    /// Keep entries whose value equals `expected`
    pub fn value_eq(self, expected: T) -> Self
    where
        T: PartialEq + Sync,
    {
        self.filter_value(move |_, value| *value == expected)
    }

    /// Keep entries whose value is one of `allowed`
    pub fn value_in<I>(self, allowed: I) -> Self
    where
        T: PartialEq + Sync,
        I: IntoIterator<Item = T>,
    {
        let allowed: Vec<T> = allowed.into_iter().collect();
        self.filter_value(move |_, value| allowed.contains(value))
    }

    /// Keep entries whose value lies in the inclusive range
    ///
    /// Either bound may be `None` to leave that side open.
    pub fn value_in_range(self, min: Option<T>, max: Option<T>) -> Self
    where
        T: PartialOrd + Sync,
    {
        self.filter_value(move |_, value| {
            if let Some(min) = &min {
                if value < min {
                    return false;
                }
            }
            if let Some(max) = &max {
                if value > max {
                    return false;
                }
            }
            true
        })
    }

    /// Keep entries whose string value contains `needle`
    pub fn value_contains(self, needle: impl Into<String>) -> Self
    where
        T: AsRef<str> + Sync,
    {
        let needle = needle.into();
        self.filter_value(move |_, value| value.as_ref().contains(needle.as_str()))
    }

    /// Keep entries whose string value matches `regex`
    pub fn value_matches(self, regex: Regex) -> Self
    where
        T: AsRef<str> + Sync,
    {
        self.filter_value(move |_, value| regex.is_match(value.as_ref()))
    }

    // ========== Pagination ==========

    /// Drop the first `n` entries of the sorted result
    pub fn skip(mut self, n: usize) -> Self {
        self.page.skip(n);
        self
    }

    /// Keep at most `n` entries after skipping
    pub fn take(mut self, n: usize) -> Self {
        self.page.take(n);
        self
    }

    // ========== Sort (single axis, last write wins) ==========

    /// Sort by key ascending (the default); clears any value sort
    pub fn sort_by_key_ascending(mut self) -> Self {
        self.sort = SortAxis::KeyAscending;
        self
    }

    /// Sort by key descending; clears any value sort
    pub fn sort_by_key_descending(mut self) -> Self {
        self.sort = SortAxis::KeyDescending;
        self
    }

    /// Sort ascending by value under an explicit comparator
    ///
    /// Clears any key sort. Entries comparing equal are tie-broken by
    /// key ascending, so the result order is total regardless of
    /// comparator quality.
    pub fn sort_by_value_ascending_with<F>(mut self, comparator: F) -> Self
    where
        F: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    {
        self.sort = SortAxis::Value {
            comparator: Arc::new(comparator),
            descending: false,
        };
        self
    }

    /// Sort descending by value under an explicit comparator
    ///
    /// Clears any key sort; ties still break by key ascending.
    pub fn sort_by_value_descending_with<F>(mut self, comparator: F) -> Self
    where
        F: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    {
        self.sort = SortAxis::Value {
            comparator: Arc::new(comparator),
            descending: true,
        };
        self
    }

    /// Sort ascending by the natural order of `T`
    pub fn sort_by_value_ascending(self) -> Self
    where
        T: Ord + Sync,
    {
        self.sort_by_value_ascending_with(T::cmp)
    }

    /// Sort descending by the natural order of `T`
    pub fn sort_by_value_descending(self) -> Self
    where
        T: Ord + Sync,
    {
        self.sort_by_value_descending_with(T::cmp)
    }

    // ========== Error policy ==========

    /// Abort on the first resolution failure instead of excluding it
    ///
    /// The default silently excludes entries whose value cannot be
    /// resolved; callers needing integrity guarantees opt in here.
    pub fn fail_on_error(mut self) -> Self {
        self.fail_on_error = true;
        self
    }

    // ========== Execution ==========

    /// Run the pipeline once; the canonical entry sequence
    pub async fn execute(&self) -> Result<Vec<Entry<T>>> {
        let snapshot = self.store.keys().await?;
        self.run(snapshot).await
    }

    /// Run the pipeline once, projecting keys only
    pub async fn execute_keys(&self) -> Result<Vec<String>> {
        Ok(self.execute().await?.into_iter().map(|e| e.key).collect())
    }

    /// Run the pipeline once, projecting values only
    pub async fn execute_values(&self) -> Result<Vec<T>> {
        Ok(self.execute().await?.into_iter().map(|e| e.value).collect())
    }

    /// Run the pipeline once, projecting a key-to-value association
    ///
    /// Keys are unique by construction, so no collision handling is
    /// needed.
    pub async fn execute_map(&self) -> Result<BTreeMap<String, T>> {
        Ok(self
            .execute()
            .await?
            .into_iter()
            .map(|e| (e.key, e.value))
            .collect())
    }

    /// Run the pipeline on every emission of the key-set stream
    ///
    /// Each emission is an independent pass over the then-current
    /// snapshot. Dropping the stream cancels observation; no cleanup is
    /// needed beyond abandoning in-flight resolution.
    pub fn observe(&self) -> BoxStream<'static, Result<Vec<Entry<T>>>> {
        let query = self.clone();
        let mut snapshots = self.store.watch_keys();
        Box::pin(stream! {
            while let Some(snapshot) = snapshots.next().await {
                match snapshot {
                    Ok(keys) => yield query.run(keys).await,
                    Err(e) => yield Err(e),
                }
            }
        })
    }

    /// Fixed pipeline: key-filter + resolve → value-filter → sort →
    /// skip → take
    async fn run(&self, snapshot: BTreeSet<String>) -> Result<Vec<Entry<T>>> {
        let total = snapshot.len();
        let mut entries: Vec<Entry<T>> = Vec::new();
        let mut excluded = 0usize;

        for key in snapshot {
            if !self.filters.accepts(&key) {
                continue;
            }
            match (self.resolver)(key.clone()).await {
                Ok(Some(value)) => {
                    if self.value_filters.iter().all(|f| f(&key, &value)) {
                        entries.push(Entry { key, value });
                    }
                }
                // Key vanished (or held a stored null) between snapshot
                // and resolution.
                Ok(None) => {}
                // Store-level failures are never suppressed.
                Err(err @ Error::Storage(_)) => return Err(err),
                Err(err) if self.fail_on_error => return Err(err),
                Err(err) => {
                    excluded += 1;
                    warn!(key = %key, error = %err, "excluding entry that failed to resolve");
                }
            }
        }

        match &self.sort {
            // Snapshot iteration is key-ascending already.
            SortAxis::KeyAscending => {}
            SortAxis::KeyDescending => entries.reverse(),
            SortAxis::Value {
                comparator,
                descending,
            } => entries.sort_by(|a, b| {
                let ordering = comparator(&a.value, &b.value);
                let ordering = if *descending {
                    ordering.reverse()
                } else {
                    ordering
                };
                ordering.then_with(|| a.key.cmp(&b.key))
            }),
        }

        let entries = self.page.apply(entries);
        debug!(total, selected = entries.len(), excluded, "value query pass");
        Ok(entries)
    }
}
