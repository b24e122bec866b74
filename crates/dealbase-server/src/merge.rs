//! Partial-update merging.
//!
//! A merge computes the full row to persist from the existing record and a
//! sparse patch: exactly the `Set` fields are replaced, everything else is
//! carried over untouched, and `updated_at` is bumped to a value strictly
//! greater than the record's previous one. `created_at` never changes.

use dealbase_proto::{Company, CompanyPatch, Customer, CustomerPatch, Deal, DealPatch, Timestamp};

/// The modification timestamp for a merged row: the fresh clock reading,
/// pushed forward if it would not exceed the previous one.
pub fn merged_timestamp(now: Timestamp, previous: Timestamp) -> Timestamp {
    Timestamp::from_micros(now.micros().max(previous.micros() + 1))
}

/// Apply a sparse update to a company.
pub fn merge_company(existing: &Company, patch: &CompanyPatch, now: Timestamp) -> Company {
    let mut updated = existing.clone();
    patch.name.apply_to(&mut updated.name);
    patch.industry.apply_to(&mut updated.industry);
    patch.website.apply_to(&mut updated.website);
    patch.phone.apply_to(&mut updated.phone);
    patch.address.apply_to(&mut updated.address);
    updated.updated_at = merged_timestamp(now, existing.updated_at);
    updated
}

/// Apply a sparse update to a customer.
pub fn merge_customer(existing: &Customer, patch: &CustomerPatch, now: Timestamp) -> Customer {
    let mut updated = existing.clone();
    patch.name.apply_to(&mut updated.name);
    patch.email.apply_to(&mut updated.email);
    patch.phone.apply_to(&mut updated.phone);
    patch.company_id.apply_to(&mut updated.company_id);
    updated.updated_at = merged_timestamp(now, existing.updated_at);
    updated
}

/// Apply a sparse update to a deal.
pub fn merge_deal(existing: &Deal, patch: &DealPatch, now: Timestamp) -> Deal {
    let mut updated = existing.clone();
    patch.description.apply_to(&mut updated.description);
    patch.amount.apply_to(&mut updated.amount);
    patch.status.apply_to(&mut updated.status);
    patch.customer_id.apply_to(&mut updated.customer_id);
    patch.company_id.apply_to(&mut updated.company_id);
    updated.updated_at = merged_timestamp(now, existing.updated_at);
    updated
}
