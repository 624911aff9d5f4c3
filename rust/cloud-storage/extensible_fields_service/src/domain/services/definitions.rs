//! Field definition service operations

use uuid::Uuid;

use super::{ExtensibleFieldServiceImpl, translate_storage_error};
use crate::domain::{
    error::{ExtensibleFieldError, Result},
    models::{
        CreateFieldRequest, EntityType, FieldDefinition, TenantId, UpdateFieldRequest,
        extensions::{new_field_definition, normalize_field_patch, validate_field_definition},
    },
    ports::{BackstopConstraint, ExtensibleFieldsRepository},
};

#[tracing::instrument(skip(service), fields(tenant_id = %request.tenant_id, entity_type = %request.entity_type))]
pub(super) async fn create_field<R>(
    service: &ExtensibleFieldServiceImpl<R>,
    request: CreateFieldRequest,
) -> Result<FieldDefinition>
where
    R: ExtensibleFieldsRepository,
{
    // Build and validate the definition
    let definition = new_field_definition(request);
    validate_field_definition(&definition).map_err(ExtensibleFieldError::Validation)?;

    let duplicate_name = || ExtensibleFieldError::DuplicateName {
        tenant_id: definition.tenant_id,
        entity_type: definition.entity_type.clone(),
        name: definition.name.clone(),
    };

    // Fast rejection; the name index backstops a racing create
    let existing = service
        .repository
        .find_field_by_name(
            definition.tenant_id,
            &definition.entity_type,
            &definition.name,
        )
        .await?;
    if existing.is_some() {
        tracing::warn!(name = %definition.name, "field name already taken");
        return Err(duplicate_name());
    }

    let created = service
        .repository
        .insert_field(definition.clone())
        .await
        .map_err(|e| translate_storage_error(e, |_| duplicate_name()))?;

    tracing::info!(field_id = %created.id, name = %created.name, "created extensible field");

    Ok(created)
}

pub(super) async fn list_fields<R>(
    service: &ExtensibleFieldServiceImpl<R>,
    tenant_id: TenantId,
    entity_type: &EntityType,
    active_only: bool,
) -> Result<Vec<FieldDefinition>>
where
    R: ExtensibleFieldsRepository,
{
    Ok(service
        .repository
        .list_fields(tenant_id, entity_type, active_only)
        .await?)
}

#[tracing::instrument(skip(service), fields(tenant_id = %request.tenant_id, field_id = %request.field_id))]
pub(super) async fn update_field<R>(
    service: &ExtensibleFieldServiceImpl<R>,
    request: UpdateFieldRequest,
) -> Result<FieldDefinition>
where
    R: ExtensibleFieldsRepository,
{
    let UpdateFieldRequest {
        tenant_id,
        field_id,
        patch,
    } = request;

    let patch = normalize_field_patch(patch).map_err(ExtensibleFieldError::Validation)?;

    let current = service
        .repository
        .get_field(tenant_id, field_id)
        .await?
        .ok_or(ExtensibleFieldError::FieldNotFound(field_id))?;

    let duplicate_name = |name: &str| ExtensibleFieldError::DuplicateName {
        tenant_id,
        entity_type: current.entity_type.clone(),
        name: name.to_string(),
    };

    if let Some(name) = patch.name.as_deref()
        && name != current.name
    {
        let existing = service
            .repository
            .find_field_by_name(tenant_id, &current.entity_type, name)
            .await?;
        if existing.is_some_and(|other| other.id != field_id) {
            tracing::warn!(name, "field name already taken");
            return Err(duplicate_name(name));
        }
    }

    let updated = service
        .repository
        .update_field(tenant_id, field_id, &patch)
        .await
        .map_err(|e| {
            translate_storage_error(e, |constraint| match constraint {
                BackstopConstraint::FieldName => {
                    duplicate_name(patch.name.as_deref().unwrap_or(&current.name))
                }
                BackstopConstraint::FieldValue => {
                    ExtensibleFieldError::UniqueConstraintViolation { field_id }
                }
            })
        })?
        .ok_or(ExtensibleFieldError::FieldNotFound(field_id))?;

    tracing::info!(
        is_active = updated.is_active,
        is_unique = updated.is_unique,
        sort_order = updated.sort_order,
        "updated extensible field"
    );

    Ok(updated)
}

#[tracing::instrument(skip(service))]
pub(super) async fn delete_field<R>(
    service: &ExtensibleFieldServiceImpl<R>,
    field_id: Uuid,
    tenant_id: TenantId,
) -> Result<u64>
where
    R: ExtensibleFieldsRepository,
{
    let deleted_values = service
        .repository
        .delete_field_cascade(tenant_id, field_id)
        .await?
        .ok_or(ExtensibleFieldError::FieldNotFound(field_id))?;

    tracing::info!(deleted_values, "deleted extensible field and its values");

    Ok(deleted_values)
}
