//! Storage port - defines the interface for extensible field persistence operations
//!
//! Every operation is tenant scoped and treats soft-deleted rows as absent. Implementations must
//! back the name and value uniqueness rules with storage-level constraints and report violations
//! of those as [StorageError::ConstraintViolation].

use std::collections::HashMap;
use std::fmt;

use models_extensible_fields::{EntityType, TenantId};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::models::{
    FieldDefinition, FieldDefinitionPatch, FieldValue, FieldValueContent, FieldValueWithDefinition,
};

/// The storage-level uniqueness constraints backing the application pre-checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackstopConstraint {
    /// One live definition per (tenant, entity type, name)
    FieldName,
    /// One live holder per (field, value) for unique fields
    FieldValue,
}

impl fmt::Display for BackstopConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackstopConstraint::FieldName => write!(f, "field name"),
            BackstopConstraint::FieldValue => write!(f, "unique field value"),
        }
    }
}

/// Errors surfaced by a storage adapter
#[derive(Debug, Error)]
pub enum StorageError {
    /// A backstop constraint rejected the write, typically after a racing writer
    #[error("{0} constraint violated")]
    ConstraintViolation(BackstopConstraint),

    /// The storage refused the data itself; the same request fails the same way again
    #[error("storage rejected the request: {0}")]
    Rejected(anyhow::Error),

    /// Connectivity or transaction failure
    #[error(transparent)]
    Unavailable(#[from] anyhow::Error),
}

/// Storage port for all extensible field persistence operations
pub trait ExtensibleFieldsRepository: Clone + Send + Sync + 'static {
    // Field Definition Operations

    /// Live definition with this exact name in the scope, active or not
    fn find_field_by_name(
        &self,
        tenant_id: TenantId,
        entity_type: &EntityType,
        name: &str,
    ) -> impl Future<Output = Result<Option<FieldDefinition>, StorageError>> + Send;

    fn insert_field(
        &self,
        definition: FieldDefinition,
    ) -> impl Future<Output = Result<FieldDefinition, StorageError>> + Send;

    /// Live definition by id, active or not
    fn get_field(
        &self,
        tenant_id: TenantId,
        field_id: Uuid,
    ) -> impl Future<Output = Result<Option<FieldDefinition>, StorageError>> + Send;

    /// Live definitions of the scope ordered by sort order, then creation
    fn list_fields(
        &self,
        tenant_id: TenantId,
        entity_type: &EntityType,
        active_only: bool,
    ) -> impl Future<Output = Result<Vec<FieldDefinition>, StorageError>> + Send;

    /// Applies the patch to a live definition. When `is_unique` changes the flag is mirrored onto
    /// the field's live values in the same transaction. Returns `None` if the definition is gone.
    fn update_field(
        &self,
        tenant_id: TenantId,
        field_id: Uuid,
        patch: &FieldDefinitionPatch,
    ) -> impl Future<Output = Result<Option<FieldDefinition>, StorageError>> + Send;

    /// Soft-deletes the field's live values and then the field itself in a single transaction.
    /// Returns the number of values removed, or `None` (with nothing changed) if the definition is
    /// gone.
    fn delete_field_cascade(
        &self,
        tenant_id: TenantId,
        field_id: Uuid,
    ) -> impl Future<Output = Result<Option<u64>, StorageError>> + Send;

    // Field Value Operations

    /// Whether an entity instance other than `entity_id` holds `value` for the field
    fn value_held_by_other_entity(
        &self,
        tenant_id: TenantId,
        field_id: Uuid,
        entity_id: &str,
        value: &FieldValueContent,
    ) -> impl Future<Output = Result<bool, StorageError>> + Send;

    /// Inserts the value or overwrites the live value of the same (field, entity id, entity type).
    /// Only writes while the owning field is live and active in the value's tenant; returns `None`
    /// otherwise.
    fn upsert_field_value(
        &self,
        value: FieldValue,
    ) -> impl Future<Output = Result<Option<FieldValue>, StorageError>> + Send;

    /// Live values of one entity instance whose fields are live
    fn get_field_values(
        &self,
        tenant_id: TenantId,
        entity_id: &str,
        entity_type: &EntityType,
    ) -> impl Future<Output = Result<Vec<FieldValueWithDefinition>, StorageError>> + Send;

    /// Live values of many entity instances, grouped by entity id
    fn get_bulk_field_values(
        &self,
        tenant_id: TenantId,
        entity_type: &EntityType,
        entity_ids: &[String],
    ) -> impl Future<Output = Result<HashMap<String, Vec<FieldValueWithDefinition>>, StorageError>>
    + Send;

    /// Returns whether a live value was deleted
    fn delete_field_value(
        &self,
        tenant_id: TenantId,
        field_id: Uuid,
        entity_id: &str,
        entity_type: &EntityType,
    ) -> impl Future<Output = Result<bool, StorageError>> + Send;

    /// Returns the number of live values deleted
    fn delete_entity_values(
        &self,
        tenant_id: TenantId,
        entity_id: &str,
        entity_type: &EntityType,
    ) -> impl Future<Output = Result<u64, StorageError>> + Send;
}
