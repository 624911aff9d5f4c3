//! Domain request models for extensible field operations

use super::{EntityType, FieldValueContent, TenantId};
use uuid::Uuid;

// ===== Field Definition Requests =====

#[derive(Debug, Clone)]
pub struct CreateFieldRequest {
    pub tenant_id: TenantId,
    pub entity_type: EntityType,
    pub name: String,
    pub is_active: bool,
    pub is_unique: bool,
    pub sort_order: i32,
}

impl CreateFieldRequest {
    /// An active, non-unique field at sort order 0
    pub fn new(tenant_id: TenantId, entity_type: EntityType, name: impl Into<String>) -> Self {
        Self {
            tenant_id,
            entity_type,
            name: name.into(),
            is_active: true,
            is_unique: false,
            sort_order: 0,
        }
    }

    pub fn unique(mut self) -> Self {
        self.is_unique = true;
        self
    }

    pub fn with_sort_order(mut self, sort_order: i32) -> Self {
        self.sort_order = sort_order;
        self
    }
}

/// Partial update of a field definition. `None` leaves the attribute unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldDefinitionPatch {
    pub name: Option<String>,
    pub is_active: Option<bool>,
    pub is_unique: Option<bool>,
    pub sort_order: Option<i32>,
}

impl FieldDefinitionPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.is_active.is_none()
            && self.is_unique.is_none()
            && self.sort_order.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct UpdateFieldRequest {
    pub tenant_id: TenantId,
    pub field_id: Uuid,
    pub patch: FieldDefinitionPatch,
}

// ===== Field Value Requests =====

#[derive(Debug, Clone)]
pub struct SetFieldValueRequest {
    pub tenant_id: TenantId,
    pub field_id: Uuid,
    pub entity_id: String,
    pub entity_type: EntityType,
    pub value: FieldValueContent,
}

#[derive(Debug, Clone)]
pub struct DeleteFieldValueRequest {
    pub tenant_id: TenantId,
    pub field_id: Uuid,
    pub entity_id: String,
    pub entity_type: EntityType,
}
