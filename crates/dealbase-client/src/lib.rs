//! dealbase client - typed async client for the dealbase record service.
//!
//! # Quick Start
//!
//! ```ignore
//! use dealbase_client::{Client, ClientConfig};
//! use dealbase_proto::{NewCompany, NewCustomer};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::connect(ClientConfig::localhost())?;
//!
//!     // Check connectivity
//!     let health = client.health().await?;
//!     println!("server is {}", health.status);
//!
//!     // Create a company and a customer in it
//!     let acme = client.create_company(NewCompany::named("Acme")).await?;
//!     let ada = client
//!         .create_customer(NewCustomer {
//!             name: "Ada".into(),
//!             email: "ada@acme.test".into(),
//!             phone: None,
//!             company_id: acme.id,
//!         })
//!         .await?;
//!     println!("created customer {} at company {}", ada.id, acme.id);
//!
//!     client.close().await;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod connection;
pub mod error;

pub use client::Client;
pub use config::ClientConfig;
pub use connection::{Connection, ConnectionState};
pub use error::Error;

/// Re-export protocol types.
pub use dealbase_proto as proto;
