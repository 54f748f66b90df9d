//! levelgate application layer.
//!
//! Services that talk to the backend through `levelgate-ports` and apply the
//! domain's unlock rules. No adapter types appear here.

pub mod application;
