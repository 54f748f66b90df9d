//! Infrastructure layer - External adapters

pub mod http_client;
pub mod platform;
pub mod storage;

pub use http_client::HttpApiAdapter;
pub use platform::{SystemTimeProvider, TokioSleepProvider};
pub use storage::{FileStorageProvider, InMemoryStorageProvider};
