//! Query layer for prefstore
//!
//! Wildcard key matching plus two fluent, lazily-evaluated builders over
//! a store handle:
//!
//! - [`KeyQuery`]: filters/sorts/paginates the key space only
//! - [`ValueQuery`]: additionally resolves each surviving key to a typed
//!   value and filters/sorts on value content
//!
//! Builder calls are pure plan mutation - no I/O happens until an
//! execute call, and execution is an independent, re-derivable pass over
//! the current store snapshot. [`QueryExt`] hangs the builders off the
//! `Preferences` facade; [`AggregateExt`] layers grouping/counting/
//! existence views on top.

pub mod aggregate;
pub mod key_query;
pub mod pattern;
mod plan;
pub mod value_query;

pub use aggregate::AggregateExt;
pub use key_query::KeyQuery;
pub use pattern::{matches, KeyPattern};
pub use value_query::{Entry, ValueQuery};

use prefstore_core::{Primitive, Result, Serializer};
use prefstore_store::Preferences;
use serde::de::DeserializeOwned;

/// Query constructors on the `Preferences` facade
pub trait QueryExt {
    /// Query over the key space only
    fn query_keys(&self) -> KeyQuery;

    /// Query resolving keys to primitive values of type `T`
    fn query_values<T: Primitive>(&self) -> ValueQuery<T>;

    /// Query resolving keys to structured values of type `T`
    ///
    /// Fails fast with `Error::MissingSerializer` when the facade has no
    /// serializer configured.
    fn query_objects<T>(&self) -> Result<ValueQuery<T>>
    where
        T: DeserializeOwned + Send + 'static;
}

impl<S: Serializer> QueryExt for Preferences<S> {
    fn query_keys(&self) -> KeyQuery {
        KeyQuery::new(self.store())
    }

    fn query_values<T: Primitive>(&self) -> ValueQuery<T> {
        ValueQuery::primitives(self.store())
    }

    fn query_objects<T>(&self) -> Result<ValueQuery<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        ValueQuery::objects(self)
    }
}
