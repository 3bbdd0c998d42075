//! Value types for the preference store
//!
//! This module defines:
//! - [`PrimitiveValue`]: unified enum for the seven storable primitives
//! - [`Primitive`]: the trait mapping concrete Rust types onto the enum
//!
//! ## Type Rules
//!
//! - Seven primitive kinds only; structured values are encoded strings
//! - No implicit coercions: `I32(1) != I64(1)`, different kinds are
//!   NEVER equal
//! - Floats use IEEE-754 equality: `NaN != NaN`, `-0.0 == 0.0`
//! - A put replaces the value for a key atomically and completely

use crate::error::DecodeError;
use crate::kind::PrimitiveKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Canonical value type at the store boundary
///
/// One variant per [`PrimitiveKind`]. The derived `PartialEq` gives
/// IEEE-754 float semantics, and cross-variant comparisons are never
/// equal, so `I32(1) != I64(1)` and `String("1") != I32(1)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PrimitiveValue {
    /// 32-bit signed integer
    I32(i32),
    /// 64-bit signed integer
    I64(i64),
    /// 32-bit float (IEEE-754)
    F32(f32),
    /// 64-bit float (IEEE-754)
    F64(f64),
    /// Boolean
    Bool(bool),
    /// UTF-8 string
    String(String),
    /// Set of unique UTF-8 strings
    StringSet(BTreeSet<String>),
}

impl PrimitiveValue {
    /// Runtime type descriptor of this value
    pub fn kind(&self) -> PrimitiveKind {
        match self {
            PrimitiveValue::I32(_) => PrimitiveKind::I32,
            PrimitiveValue::I64(_) => PrimitiveKind::I64,
            PrimitiveValue::F32(_) => PrimitiveKind::F32,
            PrimitiveValue::F64(_) => PrimitiveKind::F64,
            PrimitiveValue::Bool(_) => PrimitiveKind::Bool,
            PrimitiveValue::String(_) => PrimitiveKind::String,
            PrimitiveValue::StringSet(_) => PrimitiveKind::StringSet,
        }
    }

    /// Borrow the string payload, if this is a `String`
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PrimitiveValue::String(s) => Some(s),
            _ => None,
        }
    }
}

/// A Rust type storable directly as a primitive
///
/// Implemented for exactly the seven primitive types. The associated
/// [`PrimitiveKind`] is the runtime descriptor typed reads hand to the
/// store boundary; `from_primitive` classifies a mismatching variant as
/// a [`DecodeError::TypeMismatch`] rather than coercing.
pub trait Primitive: Sized + Send + Sync + 'static {
    /// Runtime descriptor for this type
    const KIND: PrimitiveKind;

    /// Wrap into the canonical enum
    fn into_primitive(self) -> PrimitiveValue;

    /// Unwrap from the canonical enum, rejecting other variants
    fn from_primitive(value: PrimitiveValue) -> Result<Self, DecodeError>;
}

macro_rules! impl_primitive {
    ($ty:ty, $variant:ident, $kind:ident) => {
        impl Primitive for $ty {
            const KIND: PrimitiveKind = PrimitiveKind::$kind;

            fn into_primitive(self) -> PrimitiveValue {
                PrimitiveValue::$variant(self)
            }

            fn from_primitive(value: PrimitiveValue) -> Result<Self, DecodeError> {
                match value {
                    PrimitiveValue::$variant(v) => Ok(v),
                    other => Err(DecodeError::TypeMismatch {
                        expected: Self::KIND,
                        actual: other.kind(),
                    }),
                }
            }
        }
    };
}

impl_primitive!(i32, I32, I32);
impl_primitive!(i64, I64, I64);
impl_primitive!(f32, F32, F32);
impl_primitive!(f64, F64, F64);
impl_primitive!(bool, Bool, Bool);
impl_primitive!(String, String, String);
impl_primitive!(BTreeSet<String>, StringSet, StringSet);
