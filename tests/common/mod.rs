//! Shared test utilities for the integration test suite.
//!
//! Import via `mod common;` from the suite's main.rs.

#![allow(dead_code)]

use prefstore::{JsonSerializer, MemoryStore, Preferences};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Once};

static INIT_TRACING: Once = Once::new();

/// Install a test subscriber once so warn-level exclusions are visible.
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

/// Facade over a fresh in-memory store, no serializer.
pub fn plain_prefs() -> Preferences {
    init_tracing();
    Preferences::new(Arc::new(MemoryStore::new()))
}

/// Facade over a fresh in-memory store with the JSON serializer.
pub fn json_prefs() -> Preferences {
    init_tracing();
    Preferences::with_serializer(Arc::new(MemoryStore::new()), JsonSerializer)
}

/// Structured fixture used across object tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub age: u8,
    pub tags: Vec<String>,
}

impl Profile {
    pub fn named(name: &str, age: u8) -> Self {
        Profile {
            name: name.to_string(),
            age,
            tags: Vec::new(),
        }
    }
}

/// Seed string keys with arbitrary bool payloads.
pub async fn seed_keys(prefs: &Preferences, keys: &[&str]) {
    for key in keys {
        prefs.put(*key, true).await.unwrap();
    }
}
