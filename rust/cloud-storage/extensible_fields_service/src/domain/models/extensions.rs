//! Domain extensions for models_extensible_fields types
//!
//! This module provides helper functions for business logic (validation, constructors)
//! for models_extensible_fields types. Since we can't add methods to external types, we use free functions.

use chrono::Utc;
use uuid::Uuid;

use super::{
    CreateFieldRequest, FieldDefinition, FieldDefinitionPatch, FieldValue, SetFieldValueRequest,
};

pub const MAX_FIELD_NAME_LEN: usize = 255;

// ===== FieldDefinition Helpers =====

/// Create a new field definition from a create request
pub fn new_field_definition(request: CreateFieldRequest) -> FieldDefinition {
    let now = Utc::now();
    FieldDefinition {
        id: Uuid::now_v7(),
        tenant_id: request.tenant_id,
        entity_type: request.entity_type,
        name: request.name.trim().to_string(),
        is_active: request.is_active,
        is_unique: request.is_unique,
        sort_order: request.sort_order,
        created_at: now,
        updated_at: now,
        deleted_at: None,
    }
}

/// Validate the field definition
pub fn validate_field_definition(def: &FieldDefinition) -> Result<(), String> {
    validate_field_name(&def.name)?;

    if def.deleted_at.is_some() {
        return Err("Field definition cannot be created deleted".to_string());
    }

    Ok(())
}

/// Validate a (trimmed) field name
pub fn validate_field_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("Field name cannot be empty".to_string());
    }

    if name.chars().count() > MAX_FIELD_NAME_LEN {
        return Err(format!(
            "Field name cannot exceed {MAX_FIELD_NAME_LEN} characters"
        ));
    }

    Ok(())
}

/// Validate the patch and return it with a trimmed name
pub fn normalize_field_patch(mut patch: FieldDefinitionPatch) -> Result<FieldDefinitionPatch, String> {
    if patch.is_empty() {
        return Err("Field update must change at least one attribute".to_string());
    }

    if let Some(name) = patch.name.take() {
        let name = name.trim().to_string();
        validate_field_name(&name)?;
        patch.name = Some(name);
    }

    Ok(patch)
}

// ===== FieldValue Helpers =====

/// Create a new field value from a set request
pub fn new_field_value(request: SetFieldValueRequest) -> FieldValue {
    let now = Utc::now();
    FieldValue {
        id: Uuid::now_v7(),
        field_id: request.field_id,
        entity_id: request.entity_id,
        entity_type: request.entity_type,
        tenant_id: request.tenant_id,
        value: request.value,
        created_at: now,
        updated_at: now,
        deleted_at: None,
    }
}

/// Validate the field value
pub fn validate_field_value(value: &FieldValue) -> Result<(), String> {
    if value.entity_id.trim().is_empty() {
        return Err("Entity ID cannot be empty".to_string());
    }

    value.value.validate().map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{EntityType, FieldValueContent, TenantId};

    fn contact() -> EntityType {
        EntityType::new("contact").unwrap()
    }

    #[test]
    fn test_new_field_definition_trims_name() {
        let request = CreateFieldRequest::new(TenantId::new(Uuid::nil()), contact(), "  Email  ")
            .unique()
            .with_sort_order(3);

        let def = new_field_definition(request);

        assert_eq!(def.name, "Email");
        assert!(def.is_active);
        assert!(def.is_unique);
        assert_eq!(def.sort_order, 3);
        assert!(def.deleted_at.is_none());
        assert!(validate_field_definition(&def).is_ok());
    }

    #[test]
    fn test_field_definition_validation() {
        let mut def = new_field_definition(CreateFieldRequest::new(
            TenantId::new(Uuid::nil()),
            contact(),
            "   ",
        ));
        assert!(validate_field_definition(&def).is_err());

        def.name = "x".repeat(MAX_FIELD_NAME_LEN);
        assert!(validate_field_definition(&def).is_ok());

        def.name = "x".repeat(MAX_FIELD_NAME_LEN + 1);
        assert!(validate_field_definition(&def).is_err());
    }

    #[test]
    fn test_normalize_field_patch() {
        assert!(normalize_field_patch(FieldDefinitionPatch::default()).is_err());

        let patch = normalize_field_patch(FieldDefinitionPatch {
            name: Some(" Renamed ".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(patch.name.as_deref(), Some("Renamed"));

        let blank = normalize_field_patch(FieldDefinitionPatch {
            name: Some("  ".to_string()),
            is_active: Some(false),
            ..Default::default()
        });
        assert!(blank.is_err());
    }

    #[test]
    fn test_field_value_validation() {
        let request = SetFieldValueRequest {
            tenant_id: TenantId::new(Uuid::nil()),
            field_id: Uuid::now_v7(),
            entity_id: "contact-1".to_string(),
            entity_type: contact(),
            value: FieldValueContent::Number(1.0),
        };
        let mut value = new_field_value(request);
        assert!(validate_field_value(&value).is_ok());

        value.value = FieldValueContent::Number(f64::NAN);
        assert!(validate_field_value(&value).is_err());

        value.value = FieldValueContent::Boolean(true);
        value.entity_id = " ".to_string();
        assert!(validate_field_value(&value).is_err());
    }
}
