//! levelgate port definitions.
//!
//! Application services depend only on these traits; adapters implement them.

pub mod outbound;
