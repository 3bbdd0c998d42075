//! Key validation
//!
//! Keys are plain non-empty strings. The store imposes no hierarchy;
//! delimiter conventions like `user_name` are interpreted by tooling
//! (see the aggregate extensions), never by the store itself.

use crate::error::{Error, Result};

/// Validate a key before it reaches the store boundary
///
/// The only structural rule: a key must be non-empty. Violations surface
/// synchronously as [`Error::InvalidArgument`], before any I/O.
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(Error::invalid_argument("key must not be empty"));
    }
    Ok(())
}
