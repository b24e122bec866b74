//! HTTP route modules.

pub mod companies;
pub mod customers;
pub mod deals;
pub mod health;
