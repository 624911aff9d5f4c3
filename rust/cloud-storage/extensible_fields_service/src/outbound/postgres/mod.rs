//! PostgreSQL implementation of the storage port
//! Reads rows into the db models of models_extensible_fields and converts them to domain models

mod definitions;
mod field_values;


use std::collections::HashMap;

use anyhow::Context;
use models_extensible_fields::db::DbConversionError;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, Transaction};
use thiserror::Error;
use uuid::Uuid;

use crate::config::Config;
use crate::domain::{
    models::{
        EntityType, FieldDefinition, FieldDefinitionPatch, FieldValue, FieldValueContent,
        FieldValueWithDefinition, TenantId,
    },
    ports::{BackstopConstraint, ExtensibleFieldsRepository, StorageError},
};

/// Index enforcing one live definition per (tenant, entity type, name)
pub const FIELD_NAME_INDEX: &str = "extensible_fields_tenant_entity_name_key";
/// Index enforcing one live holder per value of a unique field
pub const FIELD_VALUE_INDEX: &str = "extensible_field_values_unique_value_key";

/// PostgreSQL storage implementation for extensible fields
#[derive(Debug, Clone)]
pub struct ExtensibleFieldsPgStorage {
    pool: PgPool,
}

/// Error type for extensible fields storage operations
#[derive(Debug, Error)]
pub enum ExtensibleFieldsStorageError {
    /// Database error
    #[error(transparent)]
    Db(#[from] sqlx::Error),
    /// The value payload could not be encoded for the JSONB column
    #[error("failed to serialize field value: {0}")]
    Serialization(#[source] serde_json::Error),
    /// A stored row could not be converted into a domain model
    #[error(transparent)]
    Conversion(#[from] DbConversionError),
}

/// SQLSTATE classes raised by the data itself: data exceptions and program limits
const PERMANENT_SQLSTATE_CLASSES: [&str; 2] = ["22", "54"];

impl ExtensibleFieldsStorageError {
    /// Whether retrying the same request would fail the same way
    fn is_permanent(&self) -> bool {
        match self {
            ExtensibleFieldsStorageError::Db(sqlx::Error::Database(db_err)) => db_err
                .code()
                .is_some_and(|code| {
                    PERMANENT_SQLSTATE_CLASSES
                        .iter()
                        .any(|class| code.starts_with(class))
                }),
            ExtensibleFieldsStorageError::Db(
                sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_),
            ) => true,
            ExtensibleFieldsStorageError::Db(_) => false,
            ExtensibleFieldsStorageError::Serialization(_)
            | ExtensibleFieldsStorageError::Conversion(_) => true,
        }
    }

    /// The backstop index a unique violation was raised by, if any
    fn violated_backstop(&self) -> Option<BackstopConstraint> {
        if let ExtensibleFieldsStorageError::Db(sqlx::Error::Database(db_err)) = self
            && db_err.is_unique_violation()
        {
            return match db_err.constraint() {
                Some(FIELD_NAME_INDEX) => Some(BackstopConstraint::FieldName),
                Some(FIELD_VALUE_INDEX) => Some(BackstopConstraint::FieldValue),
                _ => None,
            };
        }
        None
    }
}

impl From<ExtensibleFieldsStorageError> for StorageError {
    fn from(err: ExtensibleFieldsStorageError) -> Self {
        if let Some(constraint) = err.violated_backstop() {
            return StorageError::ConstraintViolation(constraint);
        }

        if err.is_permanent() {
            StorageError::Rejected(anyhow::Error::new(err))
        } else {
            StorageError::Unavailable(anyhow::Error::new(err))
        }
    }
}

/// Roll back after a failed statement and hand back the statement's error
async fn rollback_after(
    tx: Transaction<'_, Postgres>,
    err: sqlx::Error,
    message: &str,
) -> ExtensibleFieldsStorageError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.is_unique_violation()
    {
        tracing::warn!(constraint = ?db_err.constraint(), "{message}, rolling back transaction");
    } else {
        tracing::error!(error = ?err, "{message}, rolling back transaction");
    }

    if let Err(rollback_err) = tx.rollback().await {
        tracing::error!(error = ?rollback_err, "failed to rollback transaction");
    }

    ExtensibleFieldsStorageError::Db(err)
}

impl ExtensibleFieldsPgStorage {
    /// Create a new PostgreSQL extensible fields storage
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect a pool sized for the configured environment
    pub async fn connect(config: &Config) -> anyhow::Result<Self> {
        let (min_connections, max_connections) = config.environment.pool_bounds();

        let pool = PgPoolOptions::new()
            .min_connections(min_connections)
            .max_connections(max_connections)
            .connect(&config.database_url)
            .await
            .context("could not connect to the extensible fields database")?;

        tracing::info!(
            min_connections,
            max_connections,
            environment = %config.environment,
            "initialized extensible fields database connection"
        );

        Ok(Self::new(pool))
    }
}

impl ExtensibleFieldsRepository for ExtensibleFieldsPgStorage {
    // Field definition operations

    async fn find_field_by_name(
        &self,
        tenant_id: TenantId,
        entity_type: &EntityType,
        name: &str,
    ) -> Result<Option<FieldDefinition>, StorageError> {
        Ok(definitions::find_field_by_name(&self.pool, tenant_id, entity_type, name).await?)
    }

    async fn insert_field(
        &self,
        definition: FieldDefinition,
    ) -> Result<FieldDefinition, StorageError> {
        Ok(definitions::insert_field(&self.pool, definition).await?)
    }

    async fn get_field(
        &self,
        tenant_id: TenantId,
        field_id: Uuid,
    ) -> Result<Option<FieldDefinition>, StorageError> {
        Ok(definitions::get_field(&self.pool, tenant_id, field_id).await?)
    }

    async fn list_fields(
        &self,
        tenant_id: TenantId,
        entity_type: &EntityType,
        active_only: bool,
    ) -> Result<Vec<FieldDefinition>, StorageError> {
        Ok(definitions::list_fields(&self.pool, tenant_id, entity_type, active_only).await?)
    }

    async fn update_field(
        &self,
        tenant_id: TenantId,
        field_id: Uuid,
        patch: &FieldDefinitionPatch,
    ) -> Result<Option<FieldDefinition>, StorageError> {
        Ok(definitions::update_field(&self.pool, tenant_id, field_id, patch).await?)
    }

    async fn delete_field_cascade(
        &self,
        tenant_id: TenantId,
        field_id: Uuid,
    ) -> Result<Option<u64>, StorageError> {
        Ok(definitions::delete_field_cascade(&self.pool, tenant_id, field_id).await?)
    }

    // Field value operations

    async fn value_held_by_other_entity(
        &self,
        tenant_id: TenantId,
        field_id: Uuid,
        entity_id: &str,
        value: &FieldValueContent,
    ) -> Result<bool, StorageError> {
        Ok(
            field_values::value_held_by_other_entity(
                &self.pool, tenant_id, field_id, entity_id, value,
            )
            .await?,
        )
    }

    async fn upsert_field_value(&self, value: FieldValue) -> Result<Option<FieldValue>, StorageError> {
        Ok(field_values::upsert_field_value(&self.pool, value).await?)
    }

    async fn get_field_values(
        &self,
        tenant_id: TenantId,
        entity_id: &str,
        entity_type: &EntityType,
    ) -> Result<Vec<FieldValueWithDefinition>, StorageError> {
        Ok(field_values::get_field_values(&self.pool, tenant_id, entity_id, entity_type).await?)
    }

    async fn get_bulk_field_values(
        &self,
        tenant_id: TenantId,
        entity_type: &EntityType,
        entity_ids: &[String],
    ) -> Result<HashMap<String, Vec<FieldValueWithDefinition>>, StorageError> {
        Ok(
            field_values::get_bulk_field_values(&self.pool, tenant_id, entity_type, entity_ids)
                .await?,
        )
    }

    async fn delete_field_value(
        &self,
        tenant_id: TenantId,
        field_id: Uuid,
        entity_id: &str,
        entity_type: &EntityType,
    ) -> Result<bool, StorageError> {
        Ok(field_values::delete_field_value(
            &self.pool,
            tenant_id,
            field_id,
            entity_id,
            entity_type,
        )
        .await?)
    }

    async fn delete_entity_values(
        &self,
        tenant_id: TenantId,
        entity_id: &str,
        entity_type: &EntityType,
    ) -> Result<u64, StorageError> {
        Ok(field_values::delete_entity_values(&self.pool, tenant_id, entity_id, entity_type).await?)
    }
}
