//! Database layer field definition model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::{EntityType, TenantId};

/// Row of `extensible_fields` (database representation).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ExtensibleField {
    pub id: Uuid,
    pub tenant_id: TenantId,
    pub entity_type: EntityType,
    pub name: String,
    pub is_active: bool,
    pub is_unique: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

// ===== Conversions =====

impl From<ExtensibleField> for crate::service::field_definition::FieldDefinition {
    fn from(db: ExtensibleField) -> Self {
        Self {
            id: db.id,
            tenant_id: db.tenant_id,
            entity_type: db.entity_type,
            name: db.name,
            is_active: db.is_active,
            is_unique: db.is_unique,
            sort_order: db.sort_order,
            created_at: db.created_at,
            updated_at: db.updated_at,
            deleted_at: db.deleted_at,
        }
    }
}
