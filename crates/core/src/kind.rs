//! Primitive kind enumeration
//!
//! [`PrimitiveKind`] is the runtime type descriptor for the value model.
//! Typed reads pass it to the store boundary so a mismatching read can be
//! classified as a decode failure rather than returning the wrong shape.
//!
//! ## The Seven Primitives
//!
//! | Kind | Rust type |
//! |-----------|--------------------|
//! | I32 | `i32` |
//! | I64 | `i64` |
//! | F32 | `f32` |
//! | F64 | `f64` |
//! | Bool | `bool` |
//! | String | `String` |
//! | StringSet | `BTreeSet<String>` |

use serde::{Deserialize, Serialize};
use std::fmt;

/// The seven primitive kinds storable without a serializer
///
/// Structured values do not get a kind of their own: they cross the
/// serializer boundary as encoded strings and are stored as `String`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveKind {
    /// 32-bit signed integer
    I32,
    /// 64-bit signed integer
    I64,
    /// 32-bit IEEE-754 float
    F32,
    /// 64-bit IEEE-754 float
    F64,
    /// Boolean
    Bool,
    /// UTF-8 string
    String,
    /// Unordered set of unique UTF-8 strings
    StringSet,
}

impl PrimitiveKind {
    /// All primitive kinds (for iteration)
    pub fn all() -> [PrimitiveKind; 7] {
        [
            PrimitiveKind::I32,
            PrimitiveKind::I64,
            PrimitiveKind::F32,
            PrimitiveKind::F64,
            PrimitiveKind::Bool,
            PrimitiveKind::String,
            PrimitiveKind::StringSet,
        ]
    }

    /// Stable lowercase name, used in error messages
    pub fn name(&self) -> &'static str {
        match self {
            PrimitiveKind::I32 => "i32",
            PrimitiveKind::I64 => "i64",
            PrimitiveKind::F32 => "f32",
            PrimitiveKind::F64 => "f64",
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::String => "string",
            PrimitiveKind::StringSet => "string-set",
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
