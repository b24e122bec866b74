//! dealbase client API.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;

use dealbase_proto::{
    Company, CompanyPatch, Customer, CustomerPatch, Deal, DealPatch, DeleteAck, HealthReport,
    NewCompany, NewCustomer, NewDeal, Operation, RecordId, Request, Response, ResponsePayload,
    Status,
};

use crate::config::ClientConfig;
use crate::connection::Connection;
use crate::error::Error;

/// A typed client for the dealbase record service.
///
/// # Example
///
/// ```ignore
/// use dealbase_client::{Client, ClientConfig};
/// use dealbase_proto::NewCompany;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = Client::connect(ClientConfig::localhost())?;
///
///     let company = client.create_company(NewCompany::named("Acme")).await?;
///     println!("created company {}", company.id);
///
///     client.close().await;
///     Ok(())
/// }
/// ```
pub struct Client {
    connection: Arc<Mutex<Connection>>,
    next_request_id: AtomicU64,
}

impl Client {
    /// Connect to a dealbase server.
    pub fn connect(config: ClientConfig) -> Result<Self, Error> {
        let connection = Connection::establish(config)?;

        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
            next_request_id: AtomicU64::new(1),
        })
    }

    /// Connect to a server at the given address.
    pub fn connect_to(address: impl Into<String>) -> Result<Self, Error> {
        Self::connect(ClientConfig::new(address))
    }

    /// Connect to localhost on the default port.
    pub fn connect_localhost() -> Result<Self, Error> {
        Self::connect(ClientConfig::localhost())
    }

    /// Health check: returns the server's status token and current time.
    pub async fn health(&self) -> Result<HealthReport, Error> {
        self.call(Operation::Health, |payload| match payload {
            ResponsePayload::Health(report) => Ok(report),
            _ => Err(unexpected_payload("health report")),
        })
        .await
    }

    /// Create a company.
    pub async fn create_company(&self, input: NewCompany) -> Result<Company, Error> {
        self.call(Operation::CreateCompany(input), expect_company).await
    }

    /// List all companies, ascending by creation time.
    pub async fn companies(&self) -> Result<Vec<Company>, Error> {
        self.call(Operation::ListCompanies, |payload| match payload {
            ResponsePayload::Companies(companies) => Ok(companies),
            _ => Err(unexpected_payload("company list")),
        })
        .await
    }

    /// Fetch a company by id.
    pub async fn company(&self, id: RecordId) -> Result<Company, Error> {
        self.call(Operation::GetCompany { id }, expect_company).await
    }

    /// Apply a sparse update to a company.
    pub async fn update_company(&self, patch: CompanyPatch) -> Result<Company, Error> {
        self.call(Operation::UpdateCompany(patch), expect_company).await
    }

    /// Delete a company.
    pub async fn delete_company(&self, id: RecordId) -> Result<DeleteAck, Error> {
        self.call(Operation::DeleteCompany { id }, expect_ack).await
    }

    /// Create a customer.
    pub async fn create_customer(&self, input: NewCustomer) -> Result<Customer, Error> {
        self.call(Operation::CreateCustomer(input), expect_customer)
            .await
    }

    /// List all customers.
    pub async fn customers(&self) -> Result<Vec<Customer>, Error> {
        self.call(Operation::ListCustomers, |payload| match payload {
            ResponsePayload::Customers(customers) => Ok(customers),
            _ => Err(unexpected_payload("customer list")),
        })
        .await
    }

    /// Fetch a customer by id.
    pub async fn customer(&self, id: RecordId) -> Result<Customer, Error> {
        self.call(Operation::GetCustomer { id }, expect_customer).await
    }

    /// Apply a sparse update to a customer.
    pub async fn update_customer(&self, patch: CustomerPatch) -> Result<Customer, Error> {
        self.call(Operation::UpdateCustomer(patch), expect_customer)
            .await
    }

    /// Delete a customer.
    pub async fn delete_customer(&self, id: RecordId) -> Result<DeleteAck, Error> {
        self.call(Operation::DeleteCustomer { id }, expect_ack).await
    }

    /// Create a deal.
    pub async fn create_deal(&self, input: NewDeal) -> Result<Deal, Error> {
        self.call(Operation::CreateDeal(input), expect_deal).await
    }

    /// List all deals.
    pub async fn deals(&self) -> Result<Vec<Deal>, Error> {
        self.call(Operation::ListDeals, |payload| match payload {
            ResponsePayload::Deals(deals) => Ok(deals),
            _ => Err(unexpected_payload("deal list")),
        })
        .await
    }

    /// Fetch a deal by id.
    pub async fn deal(&self, id: RecordId) -> Result<Deal, Error> {
        self.call(Operation::GetDeal { id }, expect_deal).await
    }

    /// Apply a sparse update to a deal.
    pub async fn update_deal(&self, patch: DealPatch) -> Result<Deal, Error> {
        self.call(Operation::UpdateDeal(patch), expect_deal).await
    }

    /// Delete a deal.
    pub async fn delete_deal(&self, id: RecordId) -> Result<DeleteAck, Error> {
        self.call(Operation::DeleteDeal { id }, expect_ack).await
    }

    /// Close the client connection.
    pub async fn close(&self) {
        let mut conn = self.connection.lock().await;
        conn.close();
    }

    /// Check if the client is connected.
    pub async fn is_connected(&self) -> bool {
        let conn = self.connection.lock().await;
        conn.is_connected()
    }

    fn next_request_id(&self) -> u64 {
        self.next_request_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Send an operation and extract the expected payload.
    async fn call<T, F>(&self, operation: Operation, extract: F) -> Result<T, Error>
    where
        F: FnOnce(ResponsePayload) -> Result<T, Error>,
    {
        let request = Request::new(self.next_request_id(), operation);
        let response = self.send_request(&request).await?;

        match response.status {
            Status::Ok => extract(response.payload),
            Status::Error { code, message } => Err(Error::Server { code, message }),
        }
    }

    async fn send_request(&self, request: &Request) -> Result<Response, Error> {
        let conn = self.connection.lock().await;
        conn.send_request(request).await
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field(
                "next_request_id",
                &self.next_request_id.load(Ordering::SeqCst),
            )
            .finish()
    }
}

fn unexpected_payload(expected: &str) -> Error {
    Error::Protocol(dealbase_proto::Error::InvalidMessage(format!(
        "expected {}",
        expected
    )))
}

fn expect_company(payload: ResponsePayload) -> Result<Company, Error> {
    match payload {
        ResponsePayload::Company(company) => Ok(company),
        _ => Err(unexpected_payload("company")),
    }
}

fn expect_customer(payload: ResponsePayload) -> Result<Customer, Error> {
    match payload {
        ResponsePayload::Customer(customer) => Ok(customer),
        _ => Err(unexpected_payload("customer")),
    }
}

fn expect_deal(payload: ResponsePayload) -> Result<Deal, Error> {
    match payload {
        ResponsePayload::Deal(deal) => Ok(deal),
        _ => Err(unexpected_payload("deal")),
    }
}

fn expect_ack(payload: ResponsePayload) -> Result<DeleteAck, Error> {
    match payload {
        ResponsePayload::Deleted(ack) => Ok(ack),
        _ => Err(unexpected_payload("delete acknowledgment")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_generation() {
        let id = AtomicU64::new(1);
        assert_eq!(id.fetch_add(1, Ordering::SeqCst), 1);
        assert_eq!(id.fetch_add(1, Ordering::SeqCst), 2);
        assert_eq!(id.fetch_add(1, Ordering::SeqCst), 3);
    }

    #[test]
    fn test_payload_extractors() {
        assert!(expect_ack(ResponsePayload::Deleted(DeleteAck::ok())).is_ok());
        assert!(expect_ack(ResponsePayload::Empty).is_err());
        assert!(expect_company(ResponsePayload::Empty).is_err());
    }

    // End-to-end tests require a running server.
}
