//! Ports module - re-exports service and storage port definitions

pub use crate::domain::service_port::ExtensibleFieldService;
pub use crate::domain::storage_port::{BackstopConstraint, ExtensibleFieldsRepository, StorageError};
