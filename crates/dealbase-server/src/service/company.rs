//! Company record service.

use dealbase_core::EntityKind;
use dealbase_proto::{Company, CompanyPatch, DeleteAck, NewCompany, Patch, RecordId};

use crate::database::Database;
use crate::error::Error;
use crate::guard::{DeleteDecision, DeleteGuard};
use crate::merge;
use crate::service::require_non_empty;

/// CRUD operations for companies.
pub struct CompanyService<'a> {
    database: &'a Database,
}

impl<'a> CompanyService<'a> {
    /// Create a service over the given database.
    pub fn new(database: &'a Database) -> Self {
        Self { database }
    }

    /// Create a company. The store assigns the id and both timestamps.
    pub fn create(&self, input: NewCompany) -> Result<Company, Error> {
        require_non_empty(&input.name, "company name")?;

        let id = self.database.engine().allocate_id(EntityKind::Company)?;
        let now = self.database.touch();
        let company = Company {
            id,
            name: input.name,
            industry: input.industry,
            website: input.website,
            phone: input.phone,
            address: input.address,
            created_at: now,
            updated_at: now,
        };

        self.database
            .engine()
            .put(EntityKind::Company, id, &company.to_bytes()?)?;

        tracing::debug!(id, "company created");
        Ok(company)
    }

    /// Fetch a company by id.
    pub fn get(&self, id: RecordId) -> Result<Company, Error> {
        self.database
            .load_company(id)?
            .ok_or_else(|| Error::not_found(EntityKind::Company, id))
    }

    /// List all companies, ascending by creation time.
    pub fn list(&self) -> Result<Vec<Company>, Error> {
        self.database
            .engine()
            .scan(EntityKind::Company)
            .map(|row| {
                let (_, bytes) = row?;
                Ok(Company::from_bytes(&bytes)?)
            })
            .collect()
    }

    /// Apply a sparse update. Fields absent from the patch are untouched.
    pub fn update(&self, patch: CompanyPatch) -> Result<Company, Error> {
        if let Patch::Set(name) = &patch.name {
            require_non_empty(name, "company name")?;
        }

        let existing = self.get(patch.id)?;
        let updated = merge::merge_company(&existing, &patch, self.database.touch());

        self.database
            .engine()
            .put(EntityKind::Company, updated.id, &updated.to_bytes()?)?;

        tracing::debug!(id = updated.id, "company updated");
        Ok(updated)
    }

    /// Delete a company. Blocked while any customer or deal references it.
    pub fn delete(&self, id: RecordId) -> Result<DeleteAck, Error> {
        if !self.database.engine().contains(EntityKind::Company, id)? {
            return Err(Error::not_found(EntityKind::Company, id));
        }

        match DeleteGuard::new(self.database).can_delete(EntityKind::Company, id)? {
            DeleteDecision::Blocked { reason } => Err(Error::Conflict(reason)),
            DeleteDecision::Allowed => {
                self.database.engine().remove(EntityKind::Company, id)?;
                tracing::debug!(id, "company deleted");
                Ok(DeleteAck::ok())
            }
        }
    }
}
