//! Domain services - concrete implementations of service ports

mod definitions;
mod field_values;


use std::collections::HashMap;

use uuid::Uuid;

use crate::domain::{
    error::{ExtensibleFieldError, Result},
    models::{
        CreateFieldRequest, DeleteFieldValueRequest, EntityType, FieldDefinition, FieldValue,
        FieldValueWithDefinition, SetFieldValueRequest, TenantId, UpdateFieldRequest,
    },
    ports::{BackstopConstraint, ExtensibleFieldService, ExtensibleFieldsRepository, StorageError},
};

/// Concrete implementation of ExtensibleFieldService over an ExtensibleFieldsRepository
#[derive(Debug, Clone)]
pub struct ExtensibleFieldServiceImpl<R> {
    repository: R,
}

impl<R> ExtensibleFieldServiceImpl<R>
where
    R: ExtensibleFieldsRepository,
{
    /// Create a new extensible field service implementation
    pub fn new(repository: R) -> Self {
        Self { repository }
    }
}

impl<R> ExtensibleFieldService for ExtensibleFieldServiceImpl<R>
where
    R: ExtensibleFieldsRepository,
{
    // ===== Field Definition Operations =====

    async fn create_field(&self, request: CreateFieldRequest) -> Result<FieldDefinition> {
        definitions::create_field(self, request).await
    }

    async fn get_fields_for_entity(
        &self,
        tenant_id: TenantId,
        entity_type: &EntityType,
    ) -> Result<Vec<FieldDefinition>> {
        definitions::list_fields(self, tenant_id, entity_type, true).await
    }

    async fn list_fields(
        &self,
        tenant_id: TenantId,
        entity_type: &EntityType,
    ) -> Result<Vec<FieldDefinition>> {
        definitions::list_fields(self, tenant_id, entity_type, false).await
    }

    async fn get_field(&self, tenant_id: TenantId, field_id: Uuid) -> Result<Option<FieldDefinition>> {
        Ok(self.repository.get_field(tenant_id, field_id).await?)
    }

    async fn update_field(&self, request: UpdateFieldRequest) -> Result<FieldDefinition> {
        definitions::update_field(self, request).await
    }

    async fn delete_field(&self, field_id: Uuid, tenant_id: TenantId) -> Result<u64> {
        definitions::delete_field(self, field_id, tenant_id).await
    }

    // ===== Field Value Operations =====

    async fn set_field_value(&self, request: SetFieldValueRequest) -> Result<FieldValue> {
        field_values::set_field_value(self, request).await
    }

    async fn get_field_values(
        &self,
        entity_id: &str,
        entity_type: &EntityType,
        tenant_id: TenantId,
    ) -> Result<Vec<FieldValueWithDefinition>> {
        Ok(self
            .repository
            .get_field_values(tenant_id, entity_id, entity_type)
            .await?)
    }

    async fn get_bulk_field_values(
        &self,
        tenant_id: TenantId,
        entity_type: &EntityType,
        entity_ids: Vec<String>,
    ) -> Result<HashMap<String, Vec<FieldValueWithDefinition>>> {
        field_values::get_bulk_field_values(self, tenant_id, entity_type, entity_ids).await
    }

    async fn delete_field_value(&self, request: DeleteFieldValueRequest) -> Result<bool> {
        field_values::delete_field_value(self, request).await
    }

    async fn delete_entity_values(
        &self,
        tenant_id: TenantId,
        entity_id: &str,
        entity_type: &EntityType,
    ) -> Result<u64> {
        field_values::delete_entity_values(self, tenant_id, entity_id, entity_type).await
    }
}

// ===== Helper Functions =====

/// Translate a storage failure, resolving a backstop violation with the caller's context
fn translate_storage_error(
    err: StorageError,
    on_violation: impl FnOnce(BackstopConstraint) -> ExtensibleFieldError,
) -> ExtensibleFieldError {
    match err {
        StorageError::ConstraintViolation(constraint) => {
            tracing::warn!(%constraint, "storage backstop rejected a racing write");
            on_violation(constraint)
        }
        StorageError::Rejected(e) => ExtensibleFieldError::StorageRejected(e),
        StorageError::Unavailable(e) => ExtensibleFieldError::StorageUnavailable(e),
    }
}
