//! Core types for the prefstore preference store
//!
//! This crate defines the pieces every other layer builds on:
//! - [`PrimitiveValue`] / [`PrimitiveKind`]: the typed value model and its
//!   runtime type descriptor
//! - [`Primitive`]: the trait mapping Rust types onto the value model
//! - [`Serializer`] / [`JsonSerializer`]: the boundary that turns structured
//!   values into opaque encoded strings
//! - [`Error`] and its classified sub-errors
//!
//! No I/O happens here; storage backends and query builders live in their
//! own crates.

pub mod error;
pub mod key;
pub mod kind;
pub mod serializer;
pub mod value;

pub use error::{DecodeError, EncodeError, Error, Result, StorageError};
pub use key::validate_key;
pub use kind::PrimitiveKind;
pub use serializer::{JsonSerializer, Serializer};
pub use value::{Primitive, PrimitiveValue};
