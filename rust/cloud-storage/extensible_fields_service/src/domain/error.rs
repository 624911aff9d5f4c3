//! Domain error types

use models_extensible_fields::{EntityType, TenantId};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::storage_port::StorageError;

/// Domain-level errors for extensible field operations
#[derive(Debug, Error)]
pub enum ExtensibleFieldError {
    /// A live field definition with the same tenant, entity type and name already exists
    #[error("field {name:?} already exists for entity type {entity_type} in tenant {tenant_id}")]
    DuplicateName {
        tenant_id: TenantId,
        entity_type: EntityType,
        name: String,
    },

    /// The referenced field does not resolve to an active, non-deleted definition of the tenant
    #[error("field {0} not found or inactive")]
    FieldNotFoundOrInactive(Uuid),

    /// The referenced field does not resolve to a non-deleted definition of the tenant
    #[error("field {0} not found")]
    FieldNotFound(Uuid),

    /// A unique field already holds the given value for a different entity instance
    #[error("value already used by another entity for unique field {field_id}")]
    UniqueConstraintViolation { field_id: Uuid },

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Permanent storage failure caused by the request's data, not worth retrying
    #[error("storage rejected the request: {0}")]
    StorageRejected(anyhow::Error),

    /// Transient storage failure, propagated unchanged and never retried here
    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[from] anyhow::Error),
}

impl From<StorageError> for ExtensibleFieldError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Unavailable(e) => ExtensibleFieldError::StorageUnavailable(e),
            StorageError::Rejected(e) => ExtensibleFieldError::StorageRejected(e),
            // backstop violations are translated with request context by the services; one
            // reaching this conversion came from a path that cannot produce it
            e @ StorageError::ConstraintViolation(_) => {
                ExtensibleFieldError::StorageRejected(anyhow::Error::new(e))
            }
        }
    }
}

/// Result type for domain operations
pub type Result<T> = std::result::Result<T, ExtensibleFieldError>;
