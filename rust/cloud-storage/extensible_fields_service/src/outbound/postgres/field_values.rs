//! Field value storage operations

use std::collections::HashMap;

use models_extensible_fields::db::{ExtensibleFieldValue, ExtensibleFieldValueWithField};
use sqlx::PgPool;
use uuid::Uuid;

use super::ExtensibleFieldsStorageError;
use crate::domain::models::{
    EntityType, FieldValue, FieldValueContent, FieldValueWithDefinition, TenantId,
};

type Result<T> = std::result::Result<T, ExtensibleFieldsStorageError>;

/// Value columns followed by the owning field's columns, prefixed with `field_`
macro_rules! select_values_with_fields {
    () => {
        r#"
        SELECT v.id, v.field_id, v.entity_id, v.entity_type, v.tenant_id, v.value,
               v.unique_value, v.created_at, v.updated_at, v.deleted_at,
               f.tenant_id AS field_tenant_id,
               f.entity_type AS field_entity_type,
               f.name AS field_name,
               f.is_active AS field_is_active,
               f.is_unique AS field_is_unique,
               f.sort_order AS field_sort_order,
               f.created_at AS field_created_at,
               f.updated_at AS field_updated_at,
               f.deleted_at AS field_deleted_at
        FROM extensible_field_values v
        JOIN extensible_fields f ON f.id = v.field_id
        "#
    };
}

fn encode_value(value: &FieldValueContent) -> Result<serde_json::Value> {
    value.to_json().map_err(|e| {
        tracing::error!(error = ?e, "failed to serialize field value to JSON");
        ExtensibleFieldsStorageError::Serialization(e)
    })
}

fn into_domain(rows: Vec<ExtensibleFieldValueWithField>) -> Result<Vec<FieldValueWithDefinition>> {
    Ok(rows
        .into_iter()
        .map(FieldValueWithDefinition::try_from)
        .collect::<std::result::Result<Vec<_>, _>>()?)
}

#[tracing::instrument(skip(db, value))]
pub(super) async fn value_held_by_other_entity(
    db: &PgPool,
    tenant_id: TenantId,
    field_id: Uuid,
    entity_id: &str,
    value: &FieldValueContent,
) -> Result<bool> {
    let value_json = encode_value(value)?;

    let taken = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (
            SELECT 1
            FROM extensible_field_values
            WHERE tenant_id = $1
              AND field_id = $2
              AND entity_id <> $3
              AND value = $4
              AND deleted_at IS NULL
        )
        "#,
    )
    .bind(tenant_id)
    .bind(field_id)
    .bind(entity_id)
    .bind(value_json)
    .fetch_one(db)
    .await?;

    Ok(taken)
}

/// Inserts or overwrites the live value in one statement.
///
/// The row is only produced while the owning field is live and active in the value's tenant,
/// and the field row is share-locked so a concurrent cascade delete waits for this write.
/// `unique_value` is copied from the field at write time.
#[tracing::instrument(
    skip(db, value),
    fields(
        field_id = %value.field_id,
        entity_id = %value.entity_id,
        entity_type = %value.entity_type
    )
)]
pub(super) async fn upsert_field_value(
    db: &PgPool,
    value: FieldValue,
) -> Result<Option<FieldValue>> {
    let value_json = encode_value(&value.value)?;

    tracing::debug!(value_json = ?value_json, "upserting extensible field value");

    let row = sqlx::query_as::<_, ExtensibleFieldValue>(
        r#"
        INSERT INTO extensible_field_values (
            id, field_id, entity_id, entity_type, tenant_id, value, unique_value,
            created_at, updated_at
        )
        SELECT $1, f.id, $3, f.entity_type, f.tenant_id, $6, f.is_unique, $7, $7
        FROM extensible_fields f
        WHERE f.id = $2
          AND f.tenant_id = $5
          AND f.entity_type = $4
          AND f.is_active
          AND f.deleted_at IS NULL
        FOR SHARE OF f
        ON CONFLICT (field_id, entity_id, entity_type) WHERE deleted_at IS NULL
        DO UPDATE SET
            value = EXCLUDED.value,
            unique_value = EXCLUDED.unique_value,
            updated_at = NOW()
        RETURNING id, field_id, entity_id, entity_type, tenant_id, value, unique_value,
                  created_at, updated_at, deleted_at
        "#,
    )
    .bind(value.id)
    .bind(value.field_id)
    .bind(&value.entity_id)
    .bind(&value.entity_type)
    .bind(value.tenant_id)
    .bind(value_json)
    .bind(value.created_at)
    .fetch_optional(db)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(db_err) = &e
            && db_err.is_unique_violation()
        {
            tracing::warn!(constraint = ?db_err.constraint(), "field value upsert hit unique index");
        } else {
            tracing::error!(error = ?e, "failed to upsert extensible field value");
        }
        ExtensibleFieldsStorageError::Db(e)
    })?;

    let Some(row) = row else {
        tracing::debug!("owning field is not writable, nothing upserted");
        return Ok(None);
    };

    let persisted = FieldValue::try_from(row)?;

    tracing::info!(field_value_id = %persisted.id, "successfully upserted extensible field value");

    Ok(Some(persisted))
}

#[tracing::instrument(skip(db))]
pub(super) async fn get_field_values(
    db: &PgPool,
    tenant_id: TenantId,
    entity_id: &str,
    entity_type: &EntityType,
) -> Result<Vec<FieldValueWithDefinition>> {
    let rows = sqlx::query_as::<_, ExtensibleFieldValueWithField>(concat!(
        select_values_with_fields!(),
        r#"
        WHERE v.tenant_id = $1
          AND f.tenant_id = $1
          AND v.entity_id = $2
          AND v.entity_type = $3
          AND v.deleted_at IS NULL
          AND f.deleted_at IS NULL
        ORDER BY f.sort_order ASC, f.created_at ASC, f.id ASC
        "#
    ))
    .bind(tenant_id)
    .bind(entity_id)
    .bind(entity_type)
    .fetch_all(db)
    .await?;

    into_domain(rows)
}

#[tracing::instrument(skip(db, entity_ids), fields(entity_count = entity_ids.len()))]
pub(super) async fn get_bulk_field_values(
    db: &PgPool,
    tenant_id: TenantId,
    entity_type: &EntityType,
    entity_ids: &[String],
) -> Result<HashMap<String, Vec<FieldValueWithDefinition>>> {
    let rows = sqlx::query_as::<_, ExtensibleFieldValueWithField>(concat!(
        select_values_with_fields!(),
        r#"
        WHERE v.tenant_id = $1
          AND f.tenant_id = $1
          AND v.entity_type = $2
          AND v.entity_id = ANY($3)
          AND v.deleted_at IS NULL
          AND f.deleted_at IS NULL
        ORDER BY v.entity_id ASC, f.sort_order ASC, f.created_at ASC, f.id ASC
        "#
    ))
    .bind(tenant_id)
    .bind(entity_type)
    .bind(entity_ids)
    .fetch_all(db)
    .await?;

    let mut grouped: HashMap<String, Vec<FieldValueWithDefinition>> = HashMap::new();
    for value in into_domain(rows)? {
        grouped
            .entry(value.value.entity_id.clone())
            .or_default()
            .push(value);
    }

    Ok(grouped)
}

#[tracing::instrument(skip(db))]
pub(super) async fn delete_field_value(
    db: &PgPool,
    tenant_id: TenantId,
    field_id: Uuid,
    entity_id: &str,
    entity_type: &EntityType,
) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE extensible_field_values
        SET deleted_at = NOW(),
            updated_at = NOW()
        WHERE tenant_id = $1
          AND field_id = $2
          AND entity_id = $3
          AND entity_type = $4
          AND deleted_at IS NULL
        "#,
    )
    .bind(tenant_id)
    .bind(field_id)
    .bind(entity_id)
    .bind(entity_type)
    .execute(db)
    .await
    .map_err(|e| {
        tracing::error!(error = ?e, "failed to delete extensible field value");
        ExtensibleFieldsStorageError::Db(e)
    })?;

    Ok(result.rows_affected() > 0)
}

#[tracing::instrument(skip(db))]
pub(super) async fn delete_entity_values(
    db: &PgPool,
    tenant_id: TenantId,
    entity_id: &str,
    entity_type: &EntityType,
) -> Result<u64> {
    let result = sqlx::query(
        r#"
        UPDATE extensible_field_values
        SET deleted_at = NOW(),
            updated_at = NOW()
        WHERE tenant_id = $1
          AND entity_id = $2
          AND entity_type = $3
          AND deleted_at IS NULL
        "#,
    )
    .bind(tenant_id)
    .bind(entity_id)
    .bind(entity_type)
    .execute(db)
    .await
    .map_err(|e| {
        tracing::error!(error = ?e, "failed to delete extensible field values of entity");
        ExtensibleFieldsStorageError::Db(e)
    })?;

    Ok(result.rows_affected())
}
