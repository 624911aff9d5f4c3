//! Service layer composite field value with definition model.

use serde::{Deserialize, Serialize};

use super::field_definition::FieldDefinition;
use super::field_value::FieldValue;

/// Field value enriched with the definition that owns it (service representation).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldValueWithDefinition {
    pub value: FieldValue,
    pub definition: FieldDefinition,
}
