//! Database layer conversion errors

use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during database model conversions
#[derive(Debug, Error)]
pub enum DbConversionError {
    #[error(
        "Invalid database state: extensible_field_value {id} holds a payload that is not a tagged field value: {source}"
    )]
    InvalidValuePayload {
        id: Uuid,
        #[source]
        source: serde_json::Error,
    },
}
