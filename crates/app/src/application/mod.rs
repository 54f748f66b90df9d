//! Application layer - Use cases and orchestration

pub mod api;
pub mod config;
pub mod dto;
pub mod error;
pub mod services;

// Re-export common types
pub use api::Api;
pub use config::ClientConfig;
pub use error::ServiceError;
