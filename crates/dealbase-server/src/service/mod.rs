//! Record services: one per entity kind, each exposing the uniform
//! create / get / list / update / delete operation set.
//!
//! Validation runs before any store access; foreign keys are resolved
//! before a row is written; deletes consult the [`DeleteGuard`] before
//! removing anything.
//!
//! [`DeleteGuard`]: crate::guard::DeleteGuard

mod company;
mod customer;
mod deal;

pub use company::CompanyService;
pub use customer::CustomerService;
pub use deal::DealService;

use dealbase_proto::RecordId;

use crate::error::Error;

/// Reject empty required strings.
pub(crate) fn require_non_empty(value: &str, what: &str) -> Result<(), Error> {
    if value.is_empty() {
        return Err(Error::Validation(format!("{} is required", what)));
    }
    Ok(())
}

/// Reject the zero id, which the store never assigns.
pub(crate) fn require_valid_id(id: RecordId, what: &str) -> Result<(), Error> {
    if id == 0 {
        return Err(Error::Validation(format!("valid {} is required", what)));
    }
    Ok(())
}

/// Syntactic email check: a single `@` separating a non-empty local part
/// from a dotted domain, with no whitespace.
pub(crate) fn require_valid_email(email: &str) -> Result<(), Error> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(Error::Validation("valid email is required".to_string()))
    }
}
