//! Database wrapper combining the storage engine with a monotonic clock.

use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;

use dealbase_core::{EntityKind, StorageConfig, StorageEngine};
use dealbase_proto::{Company, Customer, Deal, RecordId, Timestamp};

use crate::error::Error;

/// Database wrapper that provides typed row access on top of the engine.
///
/// Mutation timestamps come from [`Database::touch`], which never returns
/// the same value twice: `updated_at` strictly increases across successful
/// mutations even when the system clock stands still or retreats.
pub struct Database {
    engine: StorageEngine,
    clock: Mutex<i64>,
}

impl Database {
    /// Open a database at the given path.
    pub fn open(data_path: &Path) -> Result<Self, Error> {
        std::fs::create_dir_all(data_path)?;
        Self::open_with_config(StorageConfig::new(data_path))
    }

    /// Open a database with a specific storage configuration.
    pub fn open_with_config(config: StorageConfig) -> Result<Self, Error> {
        let engine = StorageEngine::open(config)?;
        if engine.was_recovered() {
            tracing::info!("storage recovered from a previous unclean shutdown");
        }

        Ok(Self {
            engine,
            clock: Mutex::new(0),
        })
    }

    /// Open a throwaway database for tests.
    pub fn temporary() -> Result<Self, Error> {
        Self::open_with_config(StorageConfig::temporary())
    }

    /// Get a reference to the storage engine.
    pub fn engine(&self) -> &StorageEngine {
        &self.engine
    }

    /// A fresh mutation timestamp, strictly greater than every previous one
    /// handed out by this database instance.
    pub fn touch(&self) -> Timestamp {
        let mut last = self.clock.lock();
        let next = Timestamp::now().micros().max(*last + 1);
        *last = next;
        Timestamp::from_micros(next)
    }

    /// Load a company row, if present.
    pub fn load_company(&self, id: RecordId) -> Result<Option<Company>, Error> {
        match self.engine.get(EntityKind::Company, id)? {
            Some(row) => Ok(Some(Company::from_bytes(&row)?)),
            None => Ok(None),
        }
    }

    /// Load a customer row, if present.
    pub fn load_customer(&self, id: RecordId) -> Result<Option<Customer>, Error> {
        match self.engine.get(EntityKind::Customer, id)? {
            Some(row) => Ok(Some(Customer::from_bytes(&row)?)),
            None => Ok(None),
        }
    }

    /// Load a deal row, if present.
    pub fn load_deal(&self, id: RecordId) -> Result<Option<Deal>, Error> {
        match self.engine.get(EntityKind::Deal, id)? {
            Some(row) => Ok(Some(Deal::from_bytes(&row)?)),
            None => Ok(None),
        }
    }

    /// Flush all pending writes to disk.
    pub fn flush(&self) -> Result<(), Error> {
        self.engine.flush()?;
        Ok(())
    }
}

/// Thread-safe database handle.
pub type SharedDatabase = Arc<Database>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touch_strictly_increases() {
        let db = Database::temporary().unwrap();
        let mut previous = db.touch();
        for _ in 0..1000 {
            let next = db.touch();
            assert!(next > previous);
            previous = next;
        }
    }

    #[test]
    fn test_load_missing_rows() {
        let db = Database::temporary().unwrap();
        assert!(db.load_company(1).unwrap().is_none());
        assert!(db.load_customer(1).unwrap().is_none());
        assert!(db.load_deal(1).unwrap().is_none());
    }

    #[test]
    fn test_open_creates_data_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("data");
        let db = Database::open(&path).unwrap();
        drop(db);
        assert!(path.exists());
    }
}
