//! Service layer field value model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::service::FieldValueContent;
use crate::shared::{EntityType, TenantId};

/// The value of one custom field on one entity instance (service representation).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldValue {
    pub id: Uuid,
    pub field_id: Uuid,
    pub entity_id: String,
    /// Denormalized copy of the owning field's entity type
    pub entity_type: EntityType,
    /// Denormalized so every query can filter on the tenant explicitly
    pub tenant_id: TenantId,
    pub value: FieldValueContent,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}
