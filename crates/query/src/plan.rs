//! Query plan building blocks
//!
//! A plan is pure data accumulated by the fluent builders: ordered key
//! filters, an optional pagination window, and a sort axis. It holds no
//! connection to a store until an execute call; executing never mutates
//! it, so a builder stays reusable.

use crate::pattern::KeyPattern;
use std::sync::Arc;

/// Shared predicate type for caller-supplied key filters
pub(crate) type KeyPredicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// One key filter in an AND-combined chain
#[derive(Clone)]
pub(crate) enum KeyFilter {
    StartsWith(String),
    EndsWith(String),
    Contains(String),
    Pattern(KeyPattern),
    Predicate(KeyPredicate),
}

impl KeyFilter {
    pub(crate) fn accepts(&self, key: &str) -> bool {
        match self {
            KeyFilter::StartsWith(prefix) => key.starts_with(prefix.as_str()),
            KeyFilter::EndsWith(suffix) => key.ends_with(suffix.as_str()),
            KeyFilter::Contains(needle) => key.contains(needle.as_str()),
            KeyFilter::Pattern(pattern) => pattern.matches(key),
            KeyFilter::Predicate(predicate) => predicate(key),
        }
    }
}

/// Ordered AND-combination of key filters
///
/// Evaluation short-circuits on the first failing filter; registration
/// order is preserved, so the result equals the full conjunction.
#[derive(Clone, Default)]
pub(crate) struct KeyFilters {
    filters: Vec<KeyFilter>,
}

impl KeyFilters {
    pub(crate) fn push(&mut self, filter: KeyFilter) {
        self.filters.push(filter);
    }

    pub(crate) fn accepts(&self, key: &str) -> bool {
        self.filters.iter().all(|f| f.accepts(key))
    }
}

/// Pagination window, applied strictly after sorting
#[derive(Clone, Copy, Default)]
pub(crate) struct Page {
    skip: usize,
    take: Option<usize>,
}

impl Page {
    pub(crate) fn skip(&mut self, n: usize) {
        self.skip = n;
    }

    pub(crate) fn take(&mut self, n: usize) {
        self.take = Some(n);
    }

    pub(crate) fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        let iter = items.into_iter().skip(self.skip);
        match self.take {
            Some(n) => iter.take(n).collect(),
            None => iter.collect(),
        }
    }
}
