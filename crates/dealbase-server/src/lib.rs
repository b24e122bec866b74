//! dealbase server library.
//!
//! Validation, referential-integrity guarding, partial-update merging, and
//! request handling for the dealbase record service.

pub mod config;
pub mod database;
pub mod error;
pub mod guard;
pub mod handler;
pub mod merge;
pub mod service;
pub mod transport;

pub use config::{Args, ServerConfig};
pub use database::{Database, SharedDatabase};
pub use error::Error;
pub use guard::{DeleteDecision, DeleteGuard};
pub use handler::RequestHandler;
pub use service::{CompanyService, CustomerService, DealService};
pub use transport::{create_transport, Transport};
