//! Domain models - core business entities
//!
//! This module re-exports models_extensible_fields types as the single source of truth,
//! and adds domain behavior (validation, constructors) via free functions.

// Domain extensions (adds behavior to models_extensible_fields types)
pub mod extensions;

// Request models (domain-specific, not in models_extensible_fields)
pub mod requests;

// Re-export models_extensible_fields types as domain models (single source of truth)
pub use models_extensible_fields::service::{
    FieldDefinition, FieldValue, FieldValueContent, FieldValueWithDefinition,
};
pub use models_extensible_fields::shared::{EntityType, TenantId};

pub use extensions::*;
pub use requests::*;
