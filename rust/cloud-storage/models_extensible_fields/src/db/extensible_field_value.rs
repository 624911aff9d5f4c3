//! Database layer field value models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::error::DbConversionError;
use crate::db::extensible_field::ExtensibleField;
use crate::service::FieldValueContent;
use crate::shared::{EntityType, TenantId};

/// Row of `extensible_field_values` (database representation).
///
/// `value` holds the JSONB-encoded [FieldValueContent]. `unique_value` mirrors the owning
/// field's `is_unique` and scopes the conditional unique index on `(field_id, value)`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ExtensibleFieldValue {
    pub id: Uuid,
    pub field_id: Uuid,
    pub entity_id: String,
    pub entity_type: EntityType,
    pub tenant_id: TenantId,
    pub value: serde_json::Value,
    pub unique_value: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// A value row joined with its owning field row.
///
/// Field columns are expected with a `field_` prefix, e.g. `f.name AS field_name`.
#[derive(Debug, Clone)]
pub struct ExtensibleFieldValueWithField {
    pub value: ExtensibleFieldValue,
    pub field: ExtensibleField,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for ExtensibleFieldValueWithField {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        use sqlx::{FromRow, Row};

        let value = ExtensibleFieldValue::from_row(row)?;
        let field = ExtensibleField {
            id: row.try_get("field_id")?,
            tenant_id: row.try_get("field_tenant_id")?,
            entity_type: row.try_get("field_entity_type")?,
            name: row.try_get("field_name")?,
            is_active: row.try_get("field_is_active")?,
            is_unique: row.try_get("field_is_unique")?,
            sort_order: row.try_get("field_sort_order")?,
            created_at: row.try_get("field_created_at")?,
            updated_at: row.try_get("field_updated_at")?,
            deleted_at: row.try_get("field_deleted_at")?,
        };

        Ok(Self { value, field })
    }
}

// ===== Conversions =====

impl TryFrom<ExtensibleFieldValue> for crate::service::field_value::FieldValue {
    type Error = DbConversionError;

    fn try_from(db: ExtensibleFieldValue) -> Result<Self, Self::Error> {
        let value = FieldValueContent::from_json(db.value)
            .map_err(|source| DbConversionError::InvalidValuePayload { id: db.id, source })?;

        Ok(Self {
            id: db.id,
            field_id: db.field_id,
            entity_id: db.entity_id,
            entity_type: db.entity_type,
            tenant_id: db.tenant_id,
            value,
            created_at: db.created_at,
            updated_at: db.updated_at,
            deleted_at: db.deleted_at,
        })
    }
}

impl TryFrom<ExtensibleFieldValueWithField>
    for crate::service::field_value_with_definition::FieldValueWithDefinition
{
    type Error = DbConversionError;

    fn try_from(db: ExtensibleFieldValueWithField) -> Result<Self, Self::Error> {
        Ok(Self {
            value: db.value.try_into()?,
            definition: db.field.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::FieldValue;
    use serde_json::json;

    fn row(value: serde_json::Value) -> ExtensibleFieldValue {
        let now = Utc::now();
        ExtensibleFieldValue {
            id: Uuid::now_v7(),
            field_id: Uuid::now_v7(),
            entity_id: "contact-1".to_string(),
            entity_type: EntityType::new("contact").unwrap(),
            tenant_id: TenantId::new(Uuid::nil()),
            value,
            unique_value: false,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[test]
    fn test_value_row_converts_to_service_model() {
        let db = row(json!({"type": "Number", "value": 3.5}));
        let id = db.id;

        let value = FieldValue::try_from(db).unwrap();
        assert_eq!(value.id, id);
        assert_eq!(value.value, FieldValueContent::Number(3.5));
    }

    #[test]
    fn test_value_row_with_untagged_payload_fails() {
        let db = row(json!("just a string"));
        let id = db.id;

        match FieldValue::try_from(db) {
            Err(DbConversionError::InvalidValuePayload { id: bad_id, .. }) => {
                assert_eq!(bad_id, id)
            }
            other => panic!("expected InvalidValuePayload, got {other:?}"),
        }
    }
}
