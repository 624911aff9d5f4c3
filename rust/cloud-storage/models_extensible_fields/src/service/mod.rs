//! Service layer types - used within extensible_fields_service and by calling entity services.

pub mod field_definition;
pub mod field_value;
pub mod field_value_content;
pub mod field_value_with_definition;

pub use field_definition::FieldDefinition;
pub use field_value::FieldValue;
pub use field_value_content::FieldValueContent;
pub use field_value_with_definition::FieldValueWithDefinition;
