//! Request handler dispatching operations to the record services.

use std::sync::Arc;

use dealbase_proto::{
    error_codes, HealthReport, Operation, Request, Response, ResponsePayload, Timestamp,
};

use crate::database::Database;
use crate::error::Error;
use crate::service::{CompanyService, CustomerService, DealService};

/// Handles incoming requests and dispatches to the record services.
pub struct RequestHandler {
    database: Arc<Database>,
}

impl RequestHandler {
    /// Create a new request handler with the given database.
    pub fn new(database: Arc<Database>) -> Self {
        Self { database }
    }

    /// Handle a request and return a response.
    pub fn handle(&self, request: &Request) -> Response {
        match self.handle_inner(request) {
            Ok(payload) => Response::ok(request.id, payload),
            Err(e) => self.error_response(request.id, e),
        }
    }

    /// Internal handler that can return errors.
    fn handle_inner(&self, request: &Request) -> Result<ResponsePayload, Error> {
        let companies = CompanyService::new(&self.database);
        let customers = CustomerService::new(&self.database);
        let deals = DealService::new(&self.database);

        let payload = match &request.operation {
            Operation::Health => ResponsePayload::Health(HealthReport::ok(Timestamp::now())),

            Operation::CreateCompany(input) => {
                ResponsePayload::Company(companies.create(input.clone())?)
            }
            Operation::ListCompanies => ResponsePayload::Companies(companies.list()?),
            Operation::GetCompany { id } => ResponsePayload::Company(companies.get(*id)?),
            Operation::UpdateCompany(patch) => {
                ResponsePayload::Company(companies.update(patch.clone())?)
            }
            Operation::DeleteCompany { id } => ResponsePayload::Deleted(companies.delete(*id)?),

            Operation::CreateCustomer(input) => {
                ResponsePayload::Customer(customers.create(input.clone())?)
            }
            Operation::ListCustomers => ResponsePayload::Customers(customers.list()?),
            Operation::GetCustomer { id } => ResponsePayload::Customer(customers.get(*id)?),
            Operation::UpdateCustomer(patch) => {
                ResponsePayload::Customer(customers.update(patch.clone())?)
            }
            Operation::DeleteCustomer { id } => ResponsePayload::Deleted(customers.delete(*id)?),

            Operation::CreateDeal(input) => ResponsePayload::Deal(deals.create(input.clone())?),
            Operation::ListDeals => ResponsePayload::Deals(deals.list()?),
            Operation::GetDeal { id } => ResponsePayload::Deal(deals.get(*id)?),
            Operation::UpdateDeal(patch) => ResponsePayload::Deal(deals.update(patch.clone())?),
            Operation::DeleteDeal { id } => ResponsePayload::Deleted(deals.delete(*id)?),
        };

        Ok(payload)
    }

    /// Convert an error to an error response.
    fn error_response(&self, request_id: u64, error: Error) -> Response {
        let code = match &error {
            Error::Validation(_) => error_codes::VALIDATION,
            Error::NotFound(_) => error_codes::NOT_FOUND,
            Error::Conflict(_) => error_codes::CONFLICT,
            Error::Protocol(_) => error_codes::INVALID_REQUEST,
            Error::Storage(_) | Error::Transport(_) | Error::Config(_) | Error::Io(_) => {
                error_codes::INTERNAL
            }
        };

        Response::error(request_id, code, error.to_string())
    }
}
