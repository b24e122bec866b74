//! Server error types.

use dealbase_core::EntityKind;
use dealbase_proto::RecordId;
use thiserror::Error;

/// Server errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or missing required input, rejected before any store access.
    #[error("{0}")]
    Validation(String),

    /// A referenced id, including foreign-key ids, does not exist.
    #[error("{0}")]
    NotFound(String),

    /// A delete was blocked by dependent rows.
    #[error("{0}")]
    Conflict(String),

    /// Storage error.
    #[error("storage error: {0}")]
    Storage(#[from] dealbase_core::Error),

    /// Protocol error.
    #[error("protocol error: {0}")]
    Protocol(#[from] dealbase_proto::Error),

    /// Transport error.
    #[error("transport error: {0}")]
    Transport(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// A not-found error naming the entity kind and id.
    pub fn not_found(kind: EntityKind, id: RecordId) -> Self {
        Error::NotFound(format!("{} with ID {} not found", title(kind), id))
    }
}

fn title(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Company => "Company",
        EntityKind::Customer => "Customer",
        EntityKind::Deal => "Deal",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_names_kind_and_id() {
        let err = Error::not_found(EntityKind::Customer, 17);
        assert_eq!(err.to_string(), "Customer with ID 17 not found");
    }
}
