//! Shared utilities for specflow crates
//!
//! Kept free of dependencies on other specflow crates so every crate can
//! depend on it.

pub mod cache;
pub mod error;
pub mod json_store;

pub use cache::{content_hash, CacheStats, ContentCache};
pub use json_store::{
    load_json, load_json_if_exists, remove_json, save_json_atomic, JsonStoreError,
    JsonStoreResult,
};
