//! User record types.
//!
//! A user is an identifier plus an open set of client-supplied fields. The
//! field shape is not enforced; any JSON object is accepted.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::id::UserId;

/// Field names that belong to the server and are never taken from clients.
pub const RESERVED_FIELDS: &[&str] = &["id", "_id"];

/// Errors that can occur when decoding [`UserFields`] from a request body.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum UserFieldsError {
    /// The body is not valid JSON.
    #[error("request body is not valid JSON: {0}")]
    Malformed(String),
    /// The body is valid JSON but not an object.
    #[error("request body must be a JSON object")]
    NotAnObject,
}

/// Client-supplied user fields, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserFields(Map<String, Value>);

impl UserFields {
    /// Decode fields from a JSON request body.
    ///
    /// Reserved keys (`id`, `_id`) are dropped so that the identifier is
    /// always the one assigned by the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not a JSON object.
    pub fn from_json_slice(body: &[u8]) -> Result<Self, UserFieldsError> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| UserFieldsError::Malformed(e.to_string()))?;

        match value {
            Value::Object(map) => Ok(Self::from_map(map)),
            _ => Err(UserFieldsError::NotAnObject),
        }
    }

    /// Build fields from a JSON map, dropping reserved keys.
    #[must_use]
    pub fn from_map(mut map: Map<String, Value>) -> Self {
        for key in RESERVED_FIELDS {
            map.remove(*key);
        }
        Self(map)
    }

    /// Look up a single field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no fields were supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the underlying map.
    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

/// A persisted user.
///
/// Serializes as a flat JSON object: `{"id": "<hex>", ...fields}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Store-assigned identifier.
    pub id: UserId,
    /// Everything else the client sent.
    #[serde(flatten)]
    pub fields: UserFields,
}

impl User {
    /// Create a user from an assigned ID and its fields.
    #[must_use]
    pub const fn new(id: UserId, fields: UserFields) -> Self {
        Self { id, fields }
    }
}
