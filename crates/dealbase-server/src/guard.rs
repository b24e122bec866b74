//! Delete guard enforcing referential integrity.
//!
//! Every foreign reference in the store behaves as restrict-on-delete: a
//! row cannot be removed while dependent rows point at it. The guard only
//! decides; the caller performs the actual delete.

use dealbase_core::EntityKind;
use dealbase_proto::{Customer, Deal, RecordId};

use crate::database::Database;
use crate::error::Error;

/// Outcome of a delete-permission check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteDecision {
    /// No dependent rows; the delete may proceed.
    Allowed,
    /// Dependent rows exist; the delete must be rejected.
    Blocked {
        /// Human-readable reason, surfaced as the conflict message.
        reason: String,
    },
}

impl DeleteDecision {
    /// Whether the delete may proceed.
    pub fn is_allowed(&self) -> bool {
        matches!(self, DeleteDecision::Allowed)
    }

    fn blocked(reason: impl Into<String>) -> Self {
        DeleteDecision::Blocked {
            reason: reason.into(),
        }
    }
}

/// Decides whether a row may be deleted given its dependent-row counts.
pub struct DeleteGuard<'a> {
    database: &'a Database,
}

impl<'a> DeleteGuard<'a> {
    /// Create a guard over the given database.
    pub fn new(database: &'a Database) -> Self {
        Self { database }
    }

    /// Check whether the row may be deleted.
    ///
    /// Read-only: the guard reports a decision and never mutates. The count
    /// and the subsequent delete are separate statements, so a dependent row
    /// inserted between them goes undetected.
    pub fn can_delete(&self, kind: EntityKind, id: RecordId) -> Result<DeleteDecision, Error> {
        match kind {
            EntityKind::Company => self.check_company(id),
            EntityKind::Customer => self.check_customer(id),
            // Nothing references deals.
            EntityKind::Deal => Ok(DeleteDecision::Allowed),
        }
    }

    fn check_company(&self, id: RecordId) -> Result<DeleteDecision, Error> {
        // Deals are checked before customers; when both exist, the caller
        // observes the deals message.
        if self.count_deals(|deal| deal.company_id == id)? > 0 {
            return Ok(DeleteDecision::blocked(
                "cannot delete company with existing deals",
            ));
        }

        if self.count_customers(|customer| customer.company_id == id)? > 0 {
            return Ok(DeleteDecision::blocked(
                "cannot delete company with existing customers",
            ));
        }

        Ok(DeleteDecision::Allowed)
    }

    fn check_customer(&self, id: RecordId) -> Result<DeleteDecision, Error> {
        let deals = self.count_deals(|deal| deal.customer_id == id)?;
        if deals > 0 {
            return Ok(DeleteDecision::blocked(format!(
                "cannot delete customer with ID {} because it has {} associated deal(s)",
                id, deals
            )));
        }

        Ok(DeleteDecision::Allowed)
    }

    fn count_deals(&self, predicate: impl Fn(&Deal) -> bool) -> Result<usize, Error> {
        let mut count = 0;
        for row in self.database.engine().scan(EntityKind::Deal) {
            let (_, bytes) = row?;
            if predicate(&Deal::from_bytes(&bytes)?) {
                count += 1;
            }
        }
        Ok(count)
    }

    fn count_customers(&self, predicate: impl Fn(&Customer) -> bool) -> Result<usize, Error> {
        let mut count = 0;
        for row in self.database.engine().scan(EntityKind::Customer) {
            let (_, bytes) = row?;
            if predicate(&Customer::from_bytes(&bytes)?) {
                count += 1;
            }
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dealbase_proto::{DealStatus, Money, Timestamp};

    fn put_customer(db: &Database, id: RecordId, company_id: RecordId) {
        let customer = dealbase_proto::Customer {
            id,
            name: format!("customer {}", id),
            email: format!("c{}@example.test", id),
            phone: None,
            company_id,
            created_at: Timestamp::from_micros(1),
            updated_at: Timestamp::from_micros(1),
        };
        db.engine()
            .put(EntityKind::Customer, id, &customer.to_bytes().unwrap())
            .unwrap();
    }

    fn put_deal(db: &Database, id: RecordId, customer_id: RecordId, company_id: RecordId) {
        let deal = Deal {
            id,
            description: format!("deal {}", id),
            amount: Money::from_minor_units(100_00),
            status: DealStatus::New,
            customer_id,
            company_id,
            created_at: Timestamp::from_micros(1),
            updated_at: Timestamp::from_micros(1),
        };
        db.engine()
            .put(EntityKind::Deal, id, &deal.to_bytes().unwrap())
            .unwrap();
    }

    #[test]
    fn test_company_without_dependents_allowed() {
        let db = Database::temporary().unwrap();
        let guard = DeleteGuard::new(&db);
        assert!(guard
            .can_delete(EntityKind::Company, 1)
            .unwrap()
            .is_allowed());
    }

    #[test]
    fn test_company_with_customers_blocked() {
        let db = Database::temporary().unwrap();
        put_customer(&db, 1, 7);

        let guard = DeleteGuard::new(&db);
        let decision = guard.can_delete(EntityKind::Company, 7).unwrap();
        assert_eq!(
            decision,
            DeleteDecision::Blocked {
                reason: "cannot delete company with existing customers".to_string()
            }
        );

        // A different company is unaffected.
        assert!(guard
            .can_delete(EntityKind::Company, 8)
            .unwrap()
            .is_allowed());
    }

    #[test]
    fn test_company_with_both_reports_deals_first() {
        let db = Database::temporary().unwrap();
        put_customer(&db, 1, 7);
        put_deal(&db, 1, 1, 7);

        let guard = DeleteGuard::new(&db);
        let decision = guard.can_delete(EntityKind::Company, 7).unwrap();
        assert_eq!(
            decision,
            DeleteDecision::Blocked {
                reason: "cannot delete company with existing deals".to_string()
            }
        );
    }

    #[test]
    fn test_customer_with_deals_reports_count() {
        let db = Database::temporary().unwrap();
        put_deal(&db, 1, 3, 7);
        put_deal(&db, 2, 3, 7);

        let guard = DeleteGuard::new(&db);
        let decision = guard.can_delete(EntityKind::Customer, 3).unwrap();
        assert_eq!(
            decision,
            DeleteDecision::Blocked {
                reason: "cannot delete customer with ID 3 because it has 2 associated deal(s)"
                    .to_string()
            }
        );
    }

    #[test]
    fn test_deal_always_allowed() {
        let db = Database::temporary().unwrap();
        put_deal(&db, 1, 3, 7);

        let guard = DeleteGuard::new(&db);
        assert!(guard.can_delete(EntityKind::Deal, 1).unwrap().is_allowed());
    }
}
