//! Storage engine implementation.

use sled::{Db, IVec, Tree};

use super::{RecordKey, StorageConfig};
use crate::error::Error;

/// Tree name for metadata (id counters).
const META_TREE: &str = "meta";

/// Prefix for id counters in the meta tree.
const NEXT_ID_PREFIX: &str = "next_id:";

/// The three entity kinds held by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// A company.
    Company,
    /// A customer, referencing a company.
    Customer,
    /// A deal, referencing a customer and a company.
    Deal,
}

impl EntityKind {
    /// All entity kinds.
    pub const ALL: [EntityKind; 3] = [EntityKind::Company, EntityKind::Customer, EntityKind::Deal];

    /// Name of the sled tree holding rows of this kind.
    pub fn tree_name(&self) -> &'static str {
        match self {
            EntityKind::Company => "companies",
            EntityKind::Customer => "customers",
            EntityKind::Deal => "deals",
        }
    }

    /// Singular label for error messages.
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Company => "company",
            EntityKind::Customer => "customer",
            EntityKind::Deal => "deal",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// The entity store: one sled tree per entity kind plus a meta tree holding
/// per-kind id counters.
///
/// Rows are opaque byte blobs keyed by [`RecordKey`]; callers own the row
/// encoding. Every mutation is a single sled statement, so a row is either
/// fully present or fully absent.
pub struct StorageEngine {
    db: Db,
    companies: Tree,
    customers: Tree,
    deals: Tree,
    meta: Tree,
}

impl StorageEngine {
    /// Open or create a storage engine with the given configuration.
    pub fn open(config: StorageConfig) -> Result<Self, Error> {
        tracing::debug!(
            path = %config.path.display(),
            temporary = config.temporary,
            "opening storage engine"
        );

        let db = config.to_sled_config().open()?;
        let companies = db.open_tree(EntityKind::Company.tree_name())?;
        let customers = db.open_tree(EntityKind::Customer.tree_name())?;
        let deals = db.open_tree(EntityKind::Deal.tree_name())?;
        let meta = db.open_tree(META_TREE)?;

        Ok(Self {
            db,
            companies,
            customers,
            deals,
            meta,
        })
    }

    /// Check if the database was recovered from a previous crash.
    pub fn was_recovered(&self) -> bool {
        self.db.was_recovered()
    }

    fn tree(&self, kind: EntityKind) -> &Tree {
        match kind {
            EntityKind::Company => &self.companies,
            EntityKind::Customer => &self.customers,
            EntityKind::Deal => &self.deals,
        }
    }

    /// Allocate the next id for an entity kind.
    ///
    /// Ids start at 1 and increase strictly; allocation is atomic via the
    /// meta tree, so concurrent creates never observe the same id.
    pub fn allocate_id(&self, kind: EntityKind) -> Result<u64, Error> {
        let key = format!("{}{}", NEXT_ID_PREFIX, kind.tree_name());

        let updated = self.meta.update_and_fetch(key.as_bytes(), |old| {
            let current = old
                .and_then(|bytes| <[u8; 8]>::try_from(bytes).ok())
                .map(u64::from_be_bytes)
                .unwrap_or(0);
            Some(current.saturating_add(1).to_be_bytes().to_vec())
        })?;

        updated
            .as_deref()
            .and_then(|bytes| <[u8; 8]>::try_from(bytes).ok())
            .map(u64::from_be_bytes)
            .ok_or(Error::InvalidCounter(kind.tree_name()))
    }

    /// Write a row, inserting or overwriting.
    pub fn put(&self, kind: EntityKind, id: u64, row: &[u8]) -> Result<(), Error> {
        self.tree(kind).insert(RecordKey(id).encode(), row)?;
        Ok(())
    }

    /// Read a row.
    pub fn get(&self, kind: EntityKind, id: u64) -> Result<Option<IVec>, Error> {
        Ok(self.tree(kind).get(RecordKey(id).encode())?)
    }

    /// Check whether a row exists.
    pub fn contains(&self, kind: EntityKind, id: u64) -> Result<bool, Error> {
        Ok(self.tree(kind).contains_key(RecordKey(id).encode())?)
    }

    /// Remove a row. Returns whether a row existed.
    pub fn remove(&self, kind: EntityKind, id: u64) -> Result<bool, Error> {
        Ok(self.tree(kind).remove(RecordKey(id).encode())?.is_some())
    }

    /// Iterate all rows of a kind, ascending by id.
    pub fn scan(
        &self,
        kind: EntityKind,
    ) -> impl Iterator<Item = Result<(u64, IVec), Error>> + '_ {
        self.tree(kind).iter().map(|result| {
            let (key_bytes, row) = result?;
            let key = RecordKey::decode(&key_bytes).ok_or(Error::InvalidKey)?;
            Ok((key.0, row))
        })
    }

    /// Number of rows of a kind.
    pub fn count(&self, kind: EntityKind) -> usize {
        self.tree(kind).len()
    }

    /// Flush all pending writes to disk.
    pub fn flush(&self) -> Result<(), Error> {
        self.db.flush()?;
        Ok(())
    }
}

impl std::fmt::Debug for StorageEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageEngine")
            .field("companies", &self.companies.len())
            .field("customers", &self.customers.len())
            .field("deals", &self.deals.len())
            .finish()
    }
}
