//! Extensible Fields Service library following hexagonal architecture pattern
//!
//! This library provides the tenant-scoped custom field (entity-attribute-value) domain logic:
//! a per-tenant catalog of field definitions and the values attached to host entity instances.
//! It is composed into the entity services that own those host entities (contacts, companies, ...).

pub mod config;
pub mod domain;
pub mod outbound;
