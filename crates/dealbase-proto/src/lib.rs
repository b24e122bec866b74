//! Wire protocol types for the dealbase record service.
//!
//! This crate defines the typed operation set for the three entity kinds
//! (companies, customers, deals), using rkyv for the binary transport and
//! serde for the JSON boundary.
//!
//! # Modules
//!
//! - [`record`] - Record, input, and patch types per entity kind
//! - [`patch`] - Tri-state field presence for sparse updates
//! - [`money`] - Fixed-point monetary amounts
//! - [`time`] - Timestamps for record metadata
//! - [`message`] - Request/response message wrappers
//! - [`framing`] - Length-prefix framing for the transport layer
//! - [`error`] - Protocol error types

pub mod error;
pub mod framing;
pub mod message;
pub mod money;
pub mod patch;
pub mod record;
pub mod time;

pub use error::Error;

// Re-export commonly used types at crate root
pub use message::{
    error_codes, DeleteAck, HealthReport, Operation, Request, Response, ResponsePayload, Status,
};
pub use money::Money;
pub use patch::Patch;
pub use record::{
    Company, CompanyPatch, Customer, CustomerPatch, Deal, DealPatch, DealStatus, NewCompany,
    NewCustomer, NewDeal, RecordId,
};
pub use time::Timestamp;

/// Protocol version for wire compatibility. Incremented on incompatible
/// protocol changes.
pub const PROTOCOL_VERSION: u32 = 1;
