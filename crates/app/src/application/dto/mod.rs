//! Wire DTOs for the backend REST API
//!
//! Every field is optional on the wire; defaults are applied when the DTO is
//! normalized into a domain type, never at the call site.

pub mod access;
pub mod payment;

pub use access::{AccessCheckResponse, AccessPayload, ErrorBody};
pub use payment::PaymentStatusResponse;
