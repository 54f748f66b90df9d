//! Application services
//!
//! Services wrap the API and storage ports and hand back domain values. They
//! hold no mutable state; the session is passed in on every call.

mod cancel;

pub mod access_service;
pub mod catalog_service;
pub mod level_gate;
pub mod payment_service;
pub mod progress_service;
pub mod session_service;

pub use access_service::{normalize_access_result, reason_from_error_body, AccessService};
pub use catalog_service::CatalogService;
pub use level_gate::{LevelCheck, LevelGate, LevelView, PathUnlockView};
pub use payment_service::{PaymentWatchConfig, PaymentWatcher};
pub use progress_service::ProgressService;
pub use session_service::SessionService;
