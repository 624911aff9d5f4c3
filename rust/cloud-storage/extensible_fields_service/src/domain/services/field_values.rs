//! Field value service operations

use std::collections::HashMap;

use super::{ExtensibleFieldServiceImpl, translate_storage_error};
use crate::domain::{
    error::{ExtensibleFieldError, Result},
    models::{
        DeleteFieldValueRequest, EntityType, FieldValue, FieldValueWithDefinition,
        SetFieldValueRequest, TenantId,
        extensions::{new_field_value, validate_field_value},
    },
    ports::ExtensibleFieldsRepository,
};

#[tracing::instrument(
    skip(service, request),
    fields(
        tenant_id = %request.tenant_id,
        field_id = %request.field_id,
        entity_id = %request.entity_id,
        entity_type = %request.entity_type
    )
)]
pub(super) async fn set_field_value<R>(
    service: &ExtensibleFieldServiceImpl<R>,
    request: SetFieldValueRequest,
) -> Result<FieldValue>
where
    R: ExtensibleFieldsRepository,
{
    let field_id = request.field_id;

    // Build and validate the value
    let value = new_field_value(request);
    validate_field_value(&value).map_err(ExtensibleFieldError::Validation)?;

    // The owning field must be live and active in this tenant
    let field = service
        .repository
        .get_field(value.tenant_id, field_id)
        .await?
        .filter(|field| field.accepts_writes())
        .ok_or(ExtensibleFieldError::FieldNotFoundOrInactive(field_id))?;

    if field.entity_type != value.entity_type {
        return Err(ExtensibleFieldError::Validation(format!(
            "Field {} applies to entity type {}, not {}",
            field_id, field.entity_type, value.entity_type
        )));
    }

    // Fast rejection; the conditional value index backstops a racing writer.
    // The entity's own live value never conflicts with itself.
    if field.is_unique {
        let taken = service
            .repository
            .value_held_by_other_entity(value.tenant_id, field_id, &value.entity_id, &value.value)
            .await?;
        if taken {
            tracing::warn!("unique field value already held by another entity");
            return Err(ExtensibleFieldError::UniqueConstraintViolation { field_id });
        }
    }

    let persisted = service
        .repository
        .upsert_field_value(value)
        .await
        .map_err(|e| {
            translate_storage_error(e, |_| {
                ExtensibleFieldError::UniqueConstraintViolation { field_id }
            })
        })?
        // deactivated or deleted since the lookup
        .ok_or(ExtensibleFieldError::FieldNotFoundOrInactive(field_id))?;

    tracing::info!(field_value_id = %persisted.id, "set extensible field value");

    Ok(persisted)
}

pub(super) async fn get_bulk_field_values<R>(
    service: &ExtensibleFieldServiceImpl<R>,
    tenant_id: TenantId,
    entity_type: &EntityType,
    entity_ids: Vec<String>,
) -> Result<HashMap<String, Vec<FieldValueWithDefinition>>>
where
    R: ExtensibleFieldsRepository,
{
    if entity_ids.is_empty() {
        return Ok(HashMap::new());
    }

    Ok(service
        .repository
        .get_bulk_field_values(tenant_id, entity_type, &entity_ids)
        .await?)
}

#[tracing::instrument(skip(service))]
pub(super) async fn delete_field_value<R>(
    service: &ExtensibleFieldServiceImpl<R>,
    request: DeleteFieldValueRequest,
) -> Result<bool>
where
    R: ExtensibleFieldsRepository,
{
    let deleted = service
        .repository
        .delete_field_value(
            request.tenant_id,
            request.field_id,
            &request.entity_id,
            &request.entity_type,
        )
        .await?;

    if deleted {
        tracing::info!("deleted extensible field value");
    }

    Ok(deleted)
}

#[tracing::instrument(skip(service))]
pub(super) async fn delete_entity_values<R>(
    service: &ExtensibleFieldServiceImpl<R>,
    tenant_id: TenantId,
    entity_id: &str,
    entity_type: &EntityType,
) -> Result<u64>
where
    R: ExtensibleFieldsRepository,
{
    let deleted = service
        .repository
        .delete_entity_values(tenant_id, entity_id, entity_type)
        .await?;

    tracing::info!(deleted, "deleted extensible field values of entity");

    Ok(deleted)
}
