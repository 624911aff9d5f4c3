//! Service port - defines the interface for extensible field business logic

use std::collections::HashMap;

use uuid::Uuid;

use crate::domain::{
    error::Result,
    models::{
        CreateFieldRequest, DeleteFieldValueRequest, EntityType, FieldDefinition, FieldValue,
        FieldValueWithDefinition, SetFieldValueRequest, TenantId, UpdateFieldRequest,
    },
};

/// The service level interface used by entity services to manage custom fields and their values.
///
/// Operations complete in one storage round trip (or one transaction) and carry no timeout of
/// their own: callers bound them with a deadline (e.g. `tokio::time::timeout`), and dropping the
/// returned future aborts the in-flight storage call, rolling back any open transaction.
pub trait ExtensibleFieldService: Send + Sync + 'static {
    // Field Definition Operations

    /// Create a field, rejecting a live duplicate name in the same tenant and entity type
    fn create_field(
        &self,
        request: CreateFieldRequest,
    ) -> impl Future<Output = Result<FieldDefinition>> + Send;

    /// Active, non-deleted fields of the scope in display order
    fn get_fields_for_entity(
        &self,
        tenant_id: TenantId,
        entity_type: &EntityType,
    ) -> impl Future<Output = Result<Vec<FieldDefinition>>> + Send;

    /// All non-deleted fields of the scope, active or not, in display order
    fn list_fields(
        &self,
        tenant_id: TenantId,
        entity_type: &EntityType,
    ) -> impl Future<Output = Result<Vec<FieldDefinition>>> + Send;

    fn get_field(
        &self,
        tenant_id: TenantId,
        field_id: Uuid,
    ) -> impl Future<Output = Result<Option<FieldDefinition>>> + Send;

    /// Rename, reorder, (de)activate or toggle uniqueness of a field
    fn update_field(
        &self,
        request: UpdateFieldRequest,
    ) -> impl Future<Output = Result<FieldDefinition>> + Send;

    /// Delete a field together with all of its values, atomically.
    /// Returns the number of values removed.
    fn delete_field(
        &self,
        field_id: Uuid,
        tenant_id: TenantId,
    ) -> impl Future<Output = Result<u64>> + Send;

    // Field Value Operations

    /// Insert or overwrite the value of a field on one entity instance
    fn set_field_value(
        &self,
        request: SetFieldValueRequest,
    ) -> impl Future<Output = Result<FieldValue>> + Send;

    /// Values of one entity instance with their definitions
    fn get_field_values(
        &self,
        entity_id: &str,
        entity_type: &EntityType,
        tenant_id: TenantId,
    ) -> impl Future<Output = Result<Vec<FieldValueWithDefinition>>> + Send;

    /// Values of many entity instances, grouped by entity id
    fn get_bulk_field_values(
        &self,
        tenant_id: TenantId,
        entity_type: &EntityType,
        entity_ids: Vec<String>,
    ) -> impl Future<Output = Result<HashMap<String, Vec<FieldValueWithDefinition>>>> + Send;

    /// Returns whether a value was deleted
    fn delete_field_value(
        &self,
        request: DeleteFieldValueRequest,
    ) -> impl Future<Output = Result<bool>> + Send;

    /// Delete every value of an entity instance, e.g. when the host entity is deleted.
    /// Returns the number of values removed.
    fn delete_entity_values(
        &self,
        tenant_id: TenantId,
        entity_id: &str,
        entity_type: &EntityType,
    ) -> impl Future<Output = Result<u64>> + Send;
}
