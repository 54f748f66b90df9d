//! Infrastructure adapters for the levelgate client
//!
//! Implements the outbound ports: the backend REST API over reqwest, key/value
//! storage on disk, and the system clock.

pub mod infrastructure;
