//! Thread-safe wrapper for shared store access.
//!
//! `AttributeStore` is single-owner. `SyncStore` puts one behind
//! `Arc<RwLock<_>>` so several threads can share it: reads take the lock
//! shared, writes take it exclusively for the duration of one call.
//!
//! # Features
//!
//! Enable the `sync` feature to use this module:
//!
//! ```toml
//! [dependencies]
//! tempus = { version = "0.1", features = ["sync"] }
//! ```
//!
//! # Examples
//!
//! ```rust
//! use tempus::SyncStore;
//! use std::thread;
//!
//! let attrs: SyncStore = SyncStore::new();
//! let writer = attrs.clone();
//!
//! thread::spawn(move || {
//!     writer.set_at("color", 1.0, "red").unwrap();
//! })
//! .join()
//! .unwrap();
//!
//! assert!(attrs.has_at("color", 2.0));
//! ```

use crate::error::Result;
use crate::store::AttributeStore;
use parking_lot::RwLock;
use std::sync::Arc;
use tempus_types::stats::StoreStats;
use tempus_types::value::Value;
use tempus_types::window::TimeWindow;

/// Thread-safe wrapper around [`AttributeStore`] using `Arc<RwLock<_>>`.
///
/// Cursors are not available through the lock; use
/// [`SyncStore::remove_keys_at`] or [`SyncStore::write`] instead.
pub struct SyncStore<V = Value> {
    inner: Arc<RwLock<AttributeStore<V>>>,
}

impl<V> SyncStore<V> {
    /// Empty store with default configuration.
    pub fn new() -> Self {
        Self::from_store(AttributeStore::new())
    }

    pub fn from_store(store: AttributeStore<V>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    pub fn has_at(&self, key: &str, date: f64) -> bool {
        self.inner.read().has_at(key, date)
    }

    /// Clone of the value of `key` at `date`.
    pub fn value_at(&self, key: &str, date: f64) -> Option<V>
    where
        V: Clone,
    {
        self.inner.read().value_at(key, date).cloned()
    }

    pub fn set_at(&self, key: &str, date: f64, value: impl Into<V>) -> Result<TimeWindow> {
        self.inner.write().set_at(key, date, value)
    }

    pub fn remove_at(&self, key: &str, date: f64) -> bool {
        self.inner.write().remove_at(key, date)
    }

    pub fn clear_at(&self, date: f64) -> usize {
        self.inner.write().clear_at(date)
    }

    pub fn count_at(&self, date: f64) -> usize {
        self.inner.read().count_at(date)
    }

    /// Owned snapshot of the keys covering `date`.
    pub fn keys_at(&self, date: f64) -> Vec<String> {
        self.inner
            .read()
            .keys_at(date)
            .map(str::to_owned)
            .collect()
    }

    pub fn remove_keys_at<F>(&self, date: f64, pred: F) -> usize
    where
        F: FnMut(&str, &V) -> bool,
    {
        self.inner.write().remove_keys_at(date, pred)
    }

    pub fn stats(&self) -> StoreStats {
        self.inner.read().stats()
    }

    /// Run `f` with shared access to the store.
    pub fn read<R>(&self, f: impl FnOnce(&AttributeStore<V>) -> R) -> R {
        f(&self.inner.read())
    }

    /// Run `f` with exclusive access to the store.
    pub fn write<R>(&self, f: impl FnOnce(&mut AttributeStore<V>) -> R) -> R {
        f(&mut self.inner.write())
    }
}

impl SyncStore<Value> {
    pub fn set_flag_at(&self, key: &str, date: f64) -> Result<TimeWindow> {
        self.inner.write().set_flag_at(key, date)
    }
}

impl<V> Clone for SyncStore<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V> Default for SyncStore<V> {
    fn default() -> Self {
        Self::new()
    }
}
