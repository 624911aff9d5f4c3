pub mod entity_type;
pub mod tenant_id;

pub use entity_type::{EntityType, InvalidEntityType};
pub use tenant_id::TenantId;
