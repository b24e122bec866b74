//! Request and response message types.

use rkyv::{Archive, Deserialize, Serialize};
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

use crate::record::{
    Company, CompanyPatch, Customer, CustomerPatch, Deal, DealPatch, NewCompany, NewCustomer,
    NewDeal, RecordId,
};
use crate::time::Timestamp;

/// A request from client to server.
#[derive(
    Debug, Clone, PartialEq, Archive, Serialize, Deserialize, SerdeSerialize, SerdeDeserialize,
)]
pub struct Request {
    /// Request identifier for correlation; responses echo it.
    pub id: u64,
    /// The operation to perform.
    pub operation: Operation,
}

impl Request {
    /// Create a request for the given operation.
    pub fn new(id: u64, operation: Operation) -> Self {
        Self { id, operation }
    }

    /// Create a health-check request.
    pub fn health(id: u64) -> Self {
        Self::new(id, Operation::Health)
    }
}

/// The logical operation set: health plus create/list/get/update/delete per
/// entity kind.
#[derive(
    Debug, Clone, PartialEq, Archive, Serialize, Deserialize, SerdeSerialize, SerdeDeserialize,
)]
pub enum Operation {
    /// Health check; returns a static status token and the server time.
    Health,

    /// Create a company.
    CreateCompany(NewCompany),
    /// List all companies, ascending by creation time.
    ListCompanies,
    /// Fetch a single company.
    GetCompany {
        /// Company id.
        id: RecordId,
    },
    /// Apply a sparse update to a company.
    UpdateCompany(CompanyPatch),
    /// Delete a company. Blocked while customers or deals reference it.
    DeleteCompany {
        /// Company id.
        id: RecordId,
    },

    /// Create a customer.
    CreateCustomer(NewCustomer),
    /// List all customers.
    ListCustomers,
    /// Fetch a single customer.
    GetCustomer {
        /// Customer id.
        id: RecordId,
    },
    /// Apply a sparse update to a customer.
    UpdateCustomer(CustomerPatch),
    /// Delete a customer. Blocked while deals reference it.
    DeleteCustomer {
        /// Customer id.
        id: RecordId,
    },

    /// Create a deal.
    CreateDeal(NewDeal),
    /// List all deals.
    ListDeals,
    /// Fetch a single deal.
    GetDeal {
        /// Deal id.
        id: RecordId,
    },
    /// Apply a sparse update to a deal.
    UpdateDeal(DealPatch),
    /// Delete a deal.
    DeleteDeal {
        /// Deal id.
        id: RecordId,
    },
}

/// A response from server to client.
#[derive(
    Debug, Clone, PartialEq, Archive, Serialize, Deserialize, SerdeSerialize, SerdeDeserialize,
)]
pub struct Response {
    /// Request ID this response correlates to.
    pub id: u64,
    /// Response status.
    pub status: Status,
    /// Response payload.
    pub payload: ResponsePayload,
}

/// Response status.
#[derive(
    Debug, Clone, PartialEq, Archive, Serialize, Deserialize, SerdeSerialize, SerdeDeserialize,
)]
pub enum Status {
    /// Request succeeded.
    Ok,
    /// Request failed with an error.
    Error {
        /// Error code for programmatic handling.
        code: u32,
        /// Human-readable error message.
        message: String,
    },
}

impl Status {
    /// Check if this is a success status.
    pub fn is_ok(&self) -> bool {
        matches!(self, Status::Ok)
    }

    /// Check if this is an error status.
    pub fn is_error(&self) -> bool {
        matches!(self, Status::Error { .. })
    }
}

/// Response payload variants.
#[derive(
    Debug, Clone, PartialEq, Archive, Serialize, Deserialize, SerdeSerialize, SerdeDeserialize,
)]
pub enum ResponsePayload {
    /// A single company.
    Company(Company),
    /// All companies.
    Companies(Vec<Company>),
    /// A single customer.
    Customer(Customer),
    /// All customers.
    Customers(Vec<Customer>),
    /// A single deal.
    Deal(Deal),
    /// All deals.
    Deals(Vec<Deal>),
    /// Acknowledgment of a delete.
    Deleted(DeleteAck),
    /// Health report.
    Health(HealthReport),
    /// Empty payload (for errors).
    Empty,
}

/// Acknowledgment returned by delete operations.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Archive, Serialize, Deserialize, SerdeSerialize,
    SerdeDeserialize,
)]
pub struct DeleteAck {
    /// Always true on the success path; errors never carry an ack.
    pub success: bool,
}

impl DeleteAck {
    /// A successful delete acknowledgment.
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// Health-check report.
#[derive(
    Debug, Clone, PartialEq, Archive, Serialize, Deserialize, SerdeSerialize, SerdeDeserialize,
)]
pub struct HealthReport {
    /// Static status token.
    pub status: String,
    /// Current server time.
    pub server_time: Timestamp,
}

impl HealthReport {
    /// A healthy report stamped with the given time.
    pub fn ok(server_time: Timestamp) -> Self {
        Self {
            status: "ok".to_string(),
            server_time,
        }
    }
}

impl Response {
    /// Create a successful response.
    pub fn ok(id: u64, payload: ResponsePayload) -> Self {
        Self {
            id,
            status: Status::Ok,
            payload,
        }
    }

    /// Create an error response.
    pub fn error(id: u64, code: u32, message: impl Into<String>) -> Self {
        Self {
            id,
            status: Status::Error {
                code,
                message: message.into(),
            },
            payload: ResponsePayload::Empty,
        }
    }
}

/// Standard error codes.
pub mod error_codes {
    /// Unknown/internal error.
    pub const INTERNAL: u32 = 1;
    /// Invalid request format.
    pub const INVALID_REQUEST: u32 = 2;
    /// Input rejected before any store access.
    pub const VALIDATION: u32 = 3;
    /// Referenced id (including foreign keys) does not exist.
    pub const NOT_FOUND: u32 = 4;
    /// Delete blocked by dependent rows.
    pub const CONFLICT: u32 = 5;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    #[test]
    fn test_health_request() {
        let request = Request::health(1);
        assert_eq!(request.id, 1);
        assert!(matches!(request.operation, Operation::Health));
    }

    #[test]
    fn test_error_response() {
        let response = Response::error(42, error_codes::NOT_FOUND, "company with ID 9 not found");
        assert_eq!(response.id, 42);
        assert!(response.status.is_error());
        assert!(matches!(response.payload, ResponsePayload::Empty));

        if let Status::Error { code, message } = &response.status {
            assert_eq!(*code, error_codes::NOT_FOUND);
            assert!(message.contains('9'));
        }
    }

    #[test]
    fn test_request_roundtrip() {
        let request = Request::new(
            5,
            Operation::CreateDeal(NewDeal {
                description: "Pilot".to_string(),
                amount: Money::from_minor_units(250_00),
                status: Default::default(),
                customer_id: 2,
                company_id: 1,
            }),
        );

        let bytes = rkyv::to_bytes::<rkyv::rancor::Error>(&request).unwrap();
        let back: Request = rkyv::from_bytes::<Request, rkyv::rancor::Error>(&bytes).unwrap();
        assert_eq!(back, request);
    }

    #[test]
    fn test_response_roundtrip() {
        let response = Response::ok(
            9,
            ResponsePayload::Companies(vec![Company {
                id: 1,
                name: "Acme".to_string(),
                industry: None,
                website: None,
                phone: None,
                address: None,
                created_at: Timestamp::from_micros(10),
                updated_at: Timestamp::from_micros(10),
            }]),
        );

        let bytes = rkyv::to_bytes::<rkyv::rancor::Error>(&response).unwrap();
        let back: Response = rkyv::from_bytes::<Response, rkyv::rancor::Error>(&bytes).unwrap();
        assert_eq!(back, response);
    }

    #[test]
    fn test_delete_ack() {
        let ack = DeleteAck::ok();
        assert!(ack.success);
        assert_eq!(serde_json::to_string(&ack).unwrap(), r#"{"success":true}"#);
    }
}
