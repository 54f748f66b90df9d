//! Platform abstraction ports
//!
//! These traits abstract platform-specific operations so that:
//! 1. Application code stays free of browser/desktop globals
//! 2. Platform-specific code is isolated in adapters
//! 3. Services are testable with hand-written fakes
//!
//! Ports layer contains only trait definitions.

use std::{future::Future, pin::Pin};

/// Time operations abstraction
pub trait TimeProvider: Clone + Send + Sync + 'static {
    /// Get current time in milliseconds since epoch
    fn now_millis(&self) -> u64;
}

/// Async sleep abstraction
pub trait SleepProvider: Clone + Send + Sync + 'static {
    fn sleep_ms(&self, ms: u64) -> Pin<Box<dyn Future<Output = ()> + Send + 'static>>;
}

/// Persistent storage abstraction (localStorage/file-based)
pub trait StorageProvider: Clone + Send + Sync + 'static {
    /// Save a string value with the given key
    fn save(&self, key: &str, value: &str);

    /// Load a string value by key, returns None if not found
    fn load(&self, key: &str) -> Option<String>;

    /// Remove a value by key
    fn remove(&self, key: &str);
}

/// Storage key constants
///
/// Shared with the web client, so the names match its localStorage keys.
pub mod storage_keys {
    pub const TOKEN: &str = "token";
    pub const USER: &str = "user";
    pub const USER_ID: &str = "userId";
}
