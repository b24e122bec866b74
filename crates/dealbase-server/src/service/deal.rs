//! Deal record service.

use dealbase_core::EntityKind;
use dealbase_proto::{Deal, DealPatch, DeleteAck, Money, NewDeal, Patch, RecordId};

use crate::database::Database;
use crate::error::Error;
use crate::guard::{DeleteDecision, DeleteGuard};
use crate::merge;
use crate::service::{require_non_empty, require_valid_id};

/// CRUD operations for deals.
pub struct DealService<'a> {
    database: &'a Database,
}

impl<'a> DealService<'a> {
    /// Create a service over the given database.
    pub fn new(database: &'a Database) -> Self {
        Self { database }
    }

    /// Create a deal. The customer reference is resolved before the company
    /// reference; when both are missing, the caller sees the customer error.
    pub fn create(&self, input: NewDeal) -> Result<Deal, Error> {
        require_non_empty(&input.description, "deal description")?;
        require_positive_amount(input.amount)?;
        require_valid_id(input.customer_id, "customer ID")?;
        require_valid_id(input.company_id, "company ID")?;

        self.require_customer(input.customer_id)?;
        self.require_company(input.company_id)?;

        let id = self.database.engine().allocate_id(EntityKind::Deal)?;
        let now = self.database.touch();
        let deal = Deal {
            id,
            description: input.description,
            amount: input.amount,
            status: input.status,
            customer_id: input.customer_id,
            company_id: input.company_id,
            created_at: now,
            updated_at: now,
        };

        self.database
            .engine()
            .put(EntityKind::Deal, id, &deal.to_bytes()?)?;

        tracing::debug!(
            id,
            customer_id = deal.customer_id,
            company_id = deal.company_id,
            "deal created"
        );
        Ok(deal)
    }

    /// Fetch a deal by id.
    pub fn get(&self, id: RecordId) -> Result<Deal, Error> {
        self.database
            .load_deal(id)?
            .ok_or_else(|| Error::not_found(EntityKind::Deal, id))
    }

    /// List all deals.
    pub fn list(&self) -> Result<Vec<Deal>, Error> {
        self.database
            .engine()
            .scan(EntityKind::Deal)
            .map(|row| {
                let (_, bytes) = row?;
                Ok(Deal::from_bytes(&bytes)?)
            })
            .collect()
    }

    /// Apply a sparse update. Supplied references are each re-validated
    /// (customer before company) before anything is written.
    pub fn update(&self, patch: DealPatch) -> Result<Deal, Error> {
        if let Patch::Set(description) = &patch.description {
            require_non_empty(description, "deal description")?;
        }
        if let Patch::Set(amount) = &patch.amount {
            require_positive_amount(*amount)?;
        }
        if let Patch::Set(customer_id) = &patch.customer_id {
            require_valid_id(*customer_id, "customer ID")?;
        }
        if let Patch::Set(company_id) = &patch.company_id {
            require_valid_id(*company_id, "company ID")?;
        }

        let existing = self.get(patch.id)?;

        if let Patch::Set(customer_id) = &patch.customer_id {
            self.require_customer(*customer_id)?;
        }
        if let Patch::Set(company_id) = &patch.company_id {
            self.require_company(*company_id)?;
        }

        let updated = merge::merge_deal(&existing, &patch, self.database.touch());

        self.database
            .engine()
            .put(EntityKind::Deal, updated.id, &updated.to_bytes()?)?;

        tracing::debug!(id = updated.id, "deal updated");
        Ok(updated)
    }

    /// Delete a deal. Nothing references deals, so an existing row always
    /// deletes.
    pub fn delete(&self, id: RecordId) -> Result<DeleteAck, Error> {
        if !self.database.engine().contains(EntityKind::Deal, id)? {
            return Err(Error::not_found(EntityKind::Deal, id));
        }

        match DeleteGuard::new(self.database).can_delete(EntityKind::Deal, id)? {
            DeleteDecision::Blocked { reason } => Err(Error::Conflict(reason)),
            DeleteDecision::Allowed => {
                self.database.engine().remove(EntityKind::Deal, id)?;
                tracing::debug!(id, "deal deleted");
                Ok(DeleteAck::ok())
            }
        }
    }

    fn require_customer(&self, customer_id: RecordId) -> Result<(), Error> {
        if !self
            .database
            .engine()
            .contains(EntityKind::Customer, customer_id)?
        {
            return Err(Error::not_found(EntityKind::Customer, customer_id));
        }
        Ok(())
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

fn require_positive_amount(amount: Money) -> Result<(), Error> {
    if !amount.is_positive() {
        return Err(Error::Validation(
            "deal amount must be positive".to_string(),
        ));
    }
    Ok(())
}
