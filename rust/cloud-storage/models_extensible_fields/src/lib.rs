//! Extensible Fields Models
//!
//! This crate defines the data models for tenant-defined custom fields using a layered layout:
//!
//! - **shared**: Shared scoping types (TenantId, EntityType) used across all layers
//! - **db**: Database layer types (row shapes of `extensible_fields` / `extensible_field_values`)
//! - **service**: Business logic layer types (used within extensible_fields_service)

pub mod db;
pub mod service;
pub mod shared;

// Re-export commonly used shared types for convenience
pub use shared::{EntityType, InvalidEntityType, TenantId};
