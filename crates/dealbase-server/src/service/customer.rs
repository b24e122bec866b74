//! Customer record service.

use dealbase_core::EntityKind;
use dealbase_proto::{Customer, CustomerPatch, DeleteAck, NewCustomer, Patch, RecordId};

use crate::database::Database;
use crate::error::Error;
use crate::guard::{DeleteDecision, DeleteGuard};
use crate::merge;
use crate::service::{require_non_empty, require_valid_email, require_valid_id};

/// CRUD operations for customers.
pub struct CustomerService<'a> {
    database: &'a Database,
}

impl<'a> CustomerService<'a> {
    /// Create a service over the given database.
    pub fn new(database: &'a Database) -> Self {
        Self { database }
    }

    /// Create a customer. The referenced company must exist.
    pub fn create(&self, input: NewCustomer) -> Result<Customer, Error> {
        require_non_empty(&input.name, "customer name")?;
        require_valid_email(&input.email)?;
        require_valid_id(input.company_id, "company ID")?;

        self.require_company(input.company_id)?;

        let id = self.database.engine().allocate_id(EntityKind::Customer)?;
        let now = self.database.touch();
        let customer = Customer {
            id,
            name: input.name,
            email: input.email,
            phone: input.phone,
            company_id: input.company_id,
            created_at: now,
            updated_at: now,
        };

        self.database
            .engine()
            .put(EntityKind::Customer, id, &customer.to_bytes()?)?;

        tracing::debug!(id, company_id = customer.company_id, "customer created");
        Ok(customer)
    }

    /// Fetch a customer by id.
    pub fn get(&self, id: RecordId) -> Result<Customer, Error> {
        self.database
            .load_customer(id)?
            .ok_or_else(|| Error::not_found(EntityKind::Customer, id))
    }

    /// List all customers.
    pub fn list(&self) -> Result<Vec<Customer>, Error> {
        self.database
            .engine()
            .scan(EntityKind::Customer)
            .map(|row| {
                let (_, bytes) = row?;
                Ok(Customer::from_bytes(&bytes)?)
            })
            .collect()
    }

    /// Apply a sparse update. A supplied `company_id` must resolve before
    /// anything is written.
    pub fn update(&self, patch: CustomerPatch) -> Result<Customer, Error> {
        if let Patch::Set(name) = &patch.name {
            require_non_empty(name, "customer name")?;
        }
        if let Patch::Set(email) = &patch.email {
            require_valid_email(email)?;
        }
        if let Patch::Set(company_id) = &patch.company_id {
            require_valid_id(*company_id, "company ID")?;
        }

        let existing = self.get(patch.id)?;

        if let Patch::Set(company_id) = &patch.company_id {
            self.require_company(*company_id)?;
        }

        let updated = merge::merge_customer(&existing, &patch, self.database.touch());

        self.database
            .engine()
            .put(EntityKind::Customer, updated.id, &updated.to_bytes()?)?;

        tracing::debug!(id = updated.id, "customer updated");
        Ok(updated)
    }

    /// Delete a customer. Blocked while any deal references it.
    pub fn delete(&self, id: RecordId) -> Result<DeleteAck, Error> {
        if !self.database.engine().contains(EntityKind::Customer, id)? {
            return Err(Error::not_found(EntityKind::Customer, id));
        }

        match DeleteGuard::new(self.database).can_delete(EntityKind::Customer, id)? {
            DeleteDecision::Blocked { reason } => Err(Error::Conflict(reason)),
            DeleteDecision::Allowed => {
                self.database.engine().remove(EntityKind::Customer, id)?;
                tracing::debug!(id, "customer deleted");
                Ok(DeleteAck::ok())
            }
        }
    }

    fn require_company(&self, company_id: RecordId) -> Result<(), Error> {
        if !self
            .database
            .engine()
            .contains(EntityKind::Company, company_id)?
        {
            return Err(Error::not_found(EntityKind::Company, company_id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::CompanyService;
    use dealbase_proto::NewCompany;

    fn db_with_company() -> (Database, RecordId) {
        let db = Database::temporary().unwrap();
        let company = CompanyService::new(&db)
            .create(NewCompany::named("Acme"))
            .unwrap();
        (db, company.id)
    }

    fn new_customer(company_id: RecordId) -> NewCustomer {
        NewCustomer {
            name: "Ada".to_string(),
            email: "ada@acme.test".to_string(),
            phone: None,
            company_id,
        }
    }

    #[test]
    fn test_create() {
        let (db, company_id) = db_with_company();
        let service = CustomerService::new(&db);

        let customer = service.create(new_customer(company_id)).unwrap();
        assert_eq!(customer.id, 1);
        assert_eq!(customer.company_id, company_id);
        assert_eq!(customer.created_at, customer.updated_at);
    }

    #[test]
    fn test_create_requires_existing_company() {
        let db = Database::temporary().unwrap();
        let err = CustomerService::new(&db)
            .create(new_customer(5))
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert!(err.to_string().contains("Company with ID 5"));
        assert_eq!(db.engine().count(EntityKind::Customer), 0);
    }

    #[test]
    fn test_create_validation_runs_before_fk_lookup() {
        let db = Database::temporary().unwrap();
        let mut input = new_customer(5);
        input.email = "not-an-email".to_string();

        // Bad email reports as validation even though the company is also
        // missing: validation happens before any store access.
        let err = CustomerService::new(&db).create(input).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_update_partial() {
        let (db, company_id) = db_with_company();
        let service = CustomerService::new(&db);
        let created = service.create(new_customer(company_id)).unwrap();

        let updated = service
            .update(
                CustomerPatch::new(created.id)
                    .with_email("ada@corp.test")
                    .with_phone(Some("555-0100".to_string())),
            )
            .unwrap();

        assert_eq!(updated.email, "ada@corp.test");
        assert_eq!(updated.phone, Some("555-0100".to_string()));
        assert_eq!(updated.name, created.name);
        assert!(updated.updated_at > created.updated_at);
    }

    #[test]
    fn test_update_rejects_missing_company_reference() {
        let (db, company_id) = db_with_company();
        let service = CustomerService::new(&db);
        let created = service.create(new_customer(company_id)).unwrap();

        let err = service
            .update(CustomerPatch::new(created.id).with_company(99))
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));

        // The customer row is unmodified.
        let current = service.get(created.id).unwrap();
        assert_eq!(current, created);
    }

    #[test]
    fn test_delete_blocked_by_deal() {
        let (db, company_id) = db_with_company();
        let service = CustomerService::new(&db);
        let customer = service.create(new_customer(company_id)).unwrap();

        let deal = dealbase_proto::Deal {
            id: 1,
            description: "Pilot".to_string(),
            amount: dealbase_proto::Money::from_minor_units(100_00),
            status: Default::default(),
            customer_id: customer.id,
            company_id,
            created_at: customer.created_at,
            updated_at: customer.created_at,
        };
        db.engine()
            .put(EntityKind::Deal, deal.id, &deal.to_bytes().unwrap())
            .unwrap();

        let err = service.delete(customer.id).unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
        assert!(err.to_string().contains("1 associated deal(s)"));

        // The customer survives the blocked delete.
        assert!(service.get(customer.id).is_ok());
    }

    #[test]
    fn test_delete() {
        let (db, company_id) = db_with_company();
        let service = CustomerService::new(&db);
        let customer = service.create(new_customer(company_id)).unwrap();

        assert!(service.delete(customer.id).unwrap().success);
        assert!(matches!(
            service.get(customer.id).unwrap_err(),
            Error::NotFound(_)
        ));
    }
}
