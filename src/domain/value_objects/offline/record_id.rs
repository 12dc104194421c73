use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

pub const PHANTOM_PREFIX: &str = "tmp-";

/// Primary key of a mirrored record: either assigned by the server or a
/// client-generated placeholder for records created offline.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Remote(i64),
    Phantom(String),
}

impl RecordId {
    /// Generate a fresh placeholder id for a record created offline.
    pub fn phantom() -> Self {
        Self::Phantom(format!("{PHANTOM_PREFIX}{}", uuid::Uuid::new_v4()))
    }

    pub fn remote(value: i64) -> Result<Self, String> {
        if value <= 0 {
            return Err(format!("Remote record id must be positive, got {value}"));
        }
        Ok(Self::Remote(value))
    }

    pub fn is_phantom(&self) -> bool {
        matches!(self, RecordId::Phantom(_))
    }

    /// Read the `"id"` field of a record document.
    pub fn from_document(document: &Value) -> Result<Self, String> {
        match document.get("id") {
            Some(value) => Self::from_json(value),
            None => Err("Record document has no \"id\" field".to_string()),
        }
    }

    pub fn from_json(value: &Value) -> Result<Self, String> {
        match value {
            Value::Number(n) => n
                .as_i64()
                .ok_or_else(|| format!("Record id is not an integer: {n}"))
                .and_then(Self::remote),
            Value::String(s) if s.starts_with(PHANTOM_PREFIX) => Ok(Self::Phantom(s.clone())),
            Value::String(s) => s
                .parse::<i64>()
                .map_err(|_| format!("Record id is neither numeric nor a placeholder: {s}"))
                .and_then(Self::remote),
            other => Err(format!("Unsupported record id value: {other}")),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            RecordId::Remote(value) => Value::from(*value),
            RecordId::Phantom(value) => Value::from(value.clone()),
        }
    }

    /// Key used by the local cache (one row per identifier).
    pub fn storage_key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Remote(value) => write!(f, "{value}"),
            RecordId::Phantom(value) => write!(f, "{value}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn phantom_ids_are_marked_and_unique() {
        let a = RecordId::phantom();
        let b = RecordId::phantom();
        assert!(a.is_phantom());
        assert_ne!(a, b);
        assert!(a.to_string().starts_with(PHANTOM_PREFIX));
    }

    #[test]
    fn parses_server_assigned_integers() {
        let id = RecordId::from_json(&json!(42)).unwrap();
        assert_eq!(id, RecordId::Remote(42));
        assert!(!id.is_phantom());
    }

    #[test]
    fn parses_placeholder_strings() {
        let id = RecordId::from_json(&json!("tmp-1234")).unwrap();
        assert!(id.is_phantom());
    }

    #[test]
    fn rejects_non_identifier_values() {
        assert!(RecordId::from_json(&json!(null)).is_err());
        assert!(RecordId::from_json(&json!(-3)).is_err());
        assert!(RecordId::from_json(&json!("acme")).is_err());
        assert!(RecordId::from_document(&json!({"name": "Acme"})).is_err());
    }
}
