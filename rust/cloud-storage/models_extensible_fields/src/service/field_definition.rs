//! Service layer field definition model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::{EntityType, TenantId};

/// A tenant-defined custom field attached to one entity type (service representation).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub id: Uuid,
    pub tenant_id: TenantId,
    pub entity_type: EntityType,
    /// Unique within `(tenant_id, entity_type)` among non-deleted definitions
    pub name: String,
    /// Inactive fields reject new value writes; existing values stay readable
    pub is_active: bool,
    /// Each value must be unique across the entity instances of this field
    pub is_unique: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl FieldDefinition {
    /// Whether new values may currently be written against this field
    pub fn accepts_writes(&self) -> bool {
        self.is_active && self.deleted_at.is_none()
    }
}
