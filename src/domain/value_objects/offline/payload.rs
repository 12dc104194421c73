use super::record_id::RecordId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Full or partial record carried by a queued operation. Always a JSON
/// object with an `"id"` field identifying the target record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OperationPayload(Value);

impl OperationPayload {
    pub fn new(value: Value) -> Result<Self, String> {
        Self::validate(&value)?;
        Ok(Self(value))
    }

    pub fn from_json_str(json: &str) -> Result<Self, String> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| format!("Invalid JSON payload: {e}"))?;
        Self::new(value)
    }

    pub fn as_json(&self) -> &Value {
        &self.0
    }

    pub fn into_inner(self) -> Value {
        self.0
    }

    pub fn record_id(&self) -> Result<RecordId, String> {
        RecordId::from_document(&self.0)
    }

    /// The payload without its `"id"` field, for remote creates where the
    /// server assigns the identifier.
    pub fn without_id(&self) -> Value {
        let mut value = self.0.clone();
        if let Value::Object(map) = &mut value {
            map.remove("id");
        }
        value
    }

    fn validate(value: &Value) -> Result<(), String> {
        let map = match value {
            Value::Object(map) => map,
            _ => return Err("Operation payload must be a JSON object".to_string()),
        };
        let id = map
            .get("id")
            .ok_or_else(|| "Operation payload must carry an \"id\" field".to_string())?;
        RecordId::from_json(id)?;
        Ok(())
    }
}

impl From<OperationPayload> for Value {
    fn from(payload: OperationPayload) -> Self {
        payload.0
    }
}
