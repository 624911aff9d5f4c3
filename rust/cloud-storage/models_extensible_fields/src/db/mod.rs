//! Database layer types - used only by the postgres adapter of extensible_fields_service.
//!
//! These structs directly map to database rows and include all database fields.
//! They should not be exposed past the storage adapter.

pub mod error;
pub mod extensible_field;
pub mod extensible_field_value;

pub use error::DbConversionError;
pub use extensible_field::ExtensibleField;
pub use extensible_field_value::{ExtensibleFieldValue, ExtensibleFieldValueWithField};
