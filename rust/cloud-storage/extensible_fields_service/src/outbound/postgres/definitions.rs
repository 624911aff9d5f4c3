//! Field definition storage operations

use models_extensible_fields::db::ExtensibleField;
use sqlx::PgPool;
use uuid::Uuid;

use super::{ExtensibleFieldsStorageError, rollback_after};
use crate::domain::models::{EntityType, FieldDefinition, FieldDefinitionPatch, TenantId};

type Result<T> = std::result::Result<T, ExtensibleFieldsStorageError>;

#[tracing::instrument(skip(db))]
pub(super) async fn find_field_by_name(
    db: &PgPool,
    tenant_id: TenantId,
    entity_type: &EntityType,
    name: &str,
) -> Result<Option<FieldDefinition>> {
    let row = sqlx::query_as::<_, ExtensibleField>(
        r#"
        SELECT id, tenant_id, entity_type, name, is_active, is_unique, sort_order,
               created_at, updated_at, deleted_at
        FROM extensible_fields
        WHERE tenant_id = $1
          AND entity_type = $2
          AND name = $3
          AND deleted_at IS NULL
        "#,
    )
    .bind(tenant_id)
    .bind(entity_type)
    .bind(name)
    .fetch_optional(db)
    .await?;

    Ok(row.map(Into::into))
}

#[tracing::instrument(skip(db, definition), fields(field_id = %definition.id, name = %definition.name))]
pub(super) async fn insert_field(
    db: &PgPool,
    definition: FieldDefinition,
) -> Result<FieldDefinition> {
    tracing::debug!("inserting extensible field");

    let row = sqlx::query_as::<_, ExtensibleField>(
        r#"
        INSERT INTO extensible_fields (
            id, tenant_id, entity_type, name, is_active, is_unique, sort_order,
            created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING id, tenant_id, entity_type, name, is_active, is_unique, sort_order,
                  created_at, updated_at, deleted_at
        "#,
    )
    .bind(definition.id)
    .bind(definition.tenant_id)
    .bind(&definition.entity_type)
    .bind(&definition.name)
    .bind(definition.is_active)
    .bind(definition.is_unique)
    .bind(definition.sort_order)
    .bind(definition.created_at)
    .bind(definition.updated_at)
    .fetch_one(db)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(db_err) = &e
            && db_err.is_unique_violation()
        {
            tracing::warn!(constraint = ?db_err.constraint(), "extensible field insert hit unique index");
        } else {
            tracing::error!(error = ?e, "failed to insert extensible field");
        }
        ExtensibleFieldsStorageError::Db(e)
    })?;

    Ok(row.into())
}

#[tracing::instrument(skip(db))]
pub(super) async fn get_field(
    db: &PgPool,
    tenant_id: TenantId,
    field_id: Uuid,
) -> Result<Option<FieldDefinition>> {
    let row = sqlx::query_as::<_, ExtensibleField>(
        r#"
        SELECT id, tenant_id, entity_type, name, is_active, is_unique, sort_order,
               created_at, updated_at, deleted_at
        FROM extensible_fields
        WHERE id = $1
          AND tenant_id = $2
          AND deleted_at IS NULL
        "#,
    )
    .bind(field_id)
    .bind(tenant_id)
    .fetch_optional(db)
    .await?;

    Ok(row.map(Into::into))
}

#[tracing::instrument(skip(db))]
pub(super) async fn list_fields(
    db: &PgPool,
    tenant_id: TenantId,
    entity_type: &EntityType,
    active_only: bool,
) -> Result<Vec<FieldDefinition>> {
    let rows = sqlx::query_as::<_, ExtensibleField>(
        r#"
        SELECT id, tenant_id, entity_type, name, is_active, is_unique, sort_order,
               created_at, updated_at, deleted_at
        FROM extensible_fields
        WHERE tenant_id = $1
          AND entity_type = $2
          AND deleted_at IS NULL
          AND (is_active OR NOT $3)
        ORDER BY sort_order ASC, created_at ASC, id ASC
        "#,
    )
    .bind(tenant_id)
    .bind(entity_type)
    .bind(active_only)
    .fetch_all(db)
    .await?;

    Ok(rows.into_iter().map(Into::into).collect())
}

#[tracing::instrument(skip(db))]
pub(super) async fn update_field(
    db: &PgPool,
    tenant_id: TenantId,
    field_id: Uuid,
    patch: &FieldDefinitionPatch,
) -> Result<Option<FieldDefinition>> {
    let mut tx = db.begin().await?;

    let updated = sqlx::query_as::<_, ExtensibleField>(
        r#"
        UPDATE extensible_fields
        SET name = COALESCE($3, name),
            is_active = COALESCE($4, is_active),
            is_unique = COALESCE($5, is_unique),
            sort_order = COALESCE($6, sort_order),
            updated_at = NOW()
        WHERE id = $1
          AND tenant_id = $2
          AND deleted_at IS NULL
        RETURNING id, tenant_id, entity_type, name, is_active, is_unique, sort_order,
                  created_at, updated_at, deleted_at
        "#,
    )
    .bind(field_id)
    .bind(tenant_id)
    .bind(patch.name.as_deref())
    .bind(patch.is_active)
    .bind(patch.is_unique)
    .bind(patch.sort_order)
    .fetch_optional(&mut *tx)
    .await;

    let row = match updated {
        Ok(Some(row)) => row,
        Ok(None) => {
            tx.rollback().await?;
            return Ok(None);
        }
        Err(e) => return Err(rollback_after(tx, e, "extensible field update failed").await),
    };

    // Live values carry the uniqueness flag so the conditional value index can enforce it
    if let Some(is_unique) = patch.is_unique {
        let mirrored = sqlx::query(
            r#"
            UPDATE extensible_field_values
            SET unique_value = $3
            WHERE field_id = $1
              AND tenant_id = $2
              AND deleted_at IS NULL
              AND unique_value <> $3
            "#,
        )
        .bind(field_id)
        .bind(tenant_id)
        .bind(is_unique)
        .execute(&mut *tx)
        .await;

        match mirrored {
            Ok(result) => {
                tracing::debug!(
                    rows_affected = result.rows_affected(),
                    is_unique,
                    "mirrored uniqueness onto field values"
                );
            }
            Err(e) => {
                return Err(
                    rollback_after(tx, e, "mirroring uniqueness onto field values failed").await,
                );
            }
        }
    }

    tx.commit().await?;

    Ok(Some(row.into()))
}

/// Soft-deletes the field's values, then the field, in one transaction.
/// The field row is locked first so no value can be written against it mid-cascade.
#[tracing::instrument(skip(db))]
pub(super) async fn delete_field_cascade(
    db: &PgPool,
    tenant_id: TenantId,
    field_id: Uuid,
) -> Result<Option<u64>> {
    let mut tx = db.begin().await?;

    let locked = sqlx::query_scalar::<_, Uuid>(
        r#"
        SELECT id
        FROM extensible_fields
        WHERE id = $1
          AND tenant_id = $2
          AND deleted_at IS NULL
        FOR UPDATE
        "#,
    )
    .bind(field_id)
    .bind(tenant_id)
    .fetch_optional(&mut *tx)
    .await;

    match locked {
        Ok(Some(_)) => {}
        Ok(None) => {
            tx.rollback().await?;
            return Ok(None);
        }
        Err(e) => return Err(rollback_after(tx, e, "locking extensible field failed").await),
    }

    let values = sqlx::query(
        r#"
        UPDATE extensible_field_values
        SET deleted_at = NOW(),
            updated_at = NOW()
        WHERE field_id = $1
          AND tenant_id = $2
          AND deleted_at IS NULL
        "#,
    )
    .bind(field_id)
    .bind(tenant_id)
    .execute(&mut *tx)
    .await;

    let deleted_values = match values {
        Ok(result) => result.rows_affected(),
        Err(e) => {
            return Err(rollback_after(tx, e, "soft-deleting extensible field values failed").await);
        }
    };

    let field = sqlx::query(
        r#"
        UPDATE extensible_fields
        SET deleted_at = NOW(),
            updated_at = NOW()
        WHERE id = $1
          AND tenant_id = $2
          AND deleted_at IS NULL
        "#,
    )
    .bind(field_id)
    .bind(tenant_id)
    .execute(&mut *tx)
    .await;

    if let Err(e) = field {
        return Err(rollback_after(tx, e, "soft-deleting extensible field failed").await);
    }

    tx.commit().await?;

    tracing::info!(deleted_values, "soft-deleted extensible field with its values");

    Ok(Some(deleted_values))
}
