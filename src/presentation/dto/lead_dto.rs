use super::Validate;
use crate::domain::entities::lead::LeadStatus;
use crate::domain::value_objects::RecordId;
use crate::shared::error::AppError;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveLeadRequest {
    pub name: String,
    pub company: Option<String>,
    pub value: f64,
    pub owner: Option<String>,
}

impl Validate for SaveLeadRequest {
    fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("Lead name is required".to_string()));
        }
        if !self.value.is_finite() || self.value < 0.0 {
            return Err(AppError::Validation(
                "Lead value must be a non-negative number".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLeadRequest {
    pub id: Value,
    pub name: Option<String>,
    pub company: Option<String>,
    pub value: Option<f64>,
    pub status: Option<String>,
    pub owner: Option<String>,
}

impl UpdateLeadRequest {
    fn has_changes(&self) -> bool {
        self.name.is_some()
            || self.company.is_some()
            || self.value.is_some()
            || self.status.is_some()
            || self.owner.is_some()
    }

    /// Partial record carrying the target id plus only the changed fields.
    pub fn into_patch(self) -> Result<Value, AppError> {
        let mut patch = Map::new();
        patch.insert("id".to_string(), self.id);
        if let Some(name) = self.name {
            patch.insert("name".to_string(), Value::from(name));
        }
        if let Some(company) = self.company {
            patch.insert("company".to_string(), Value::from(company));
        }
        if let Some(value) = self.value {
            patch.insert("value".to_string(), Value::from(value));
        }
        if let Some(status) = self.status {
            patch.insert("status".to_string(), Value::from(status));
        }
        if let Some(owner) = self.owner {
            patch.insert("owner".to_string(), Value::from(owner));
        }
        patch.insert("updated_at".to_string(), serde_json::to_value(Utc::now())?);
        Ok(Value::Object(patch))
    }
}

impl Validate for UpdateLeadRequest {
    fn validate(&self) -> Result<(), AppError> {
        RecordId::from_json(&self.id).map_err(AppError::Validation)?;
        if !self.has_changes() {
            return Err(AppError::Validation(
                "Update carries no changed fields".to_string(),
            ));
        }
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(AppError::Validation("Lead name is required".to_string()));
            }
        }
        if let Some(value) = self.value {
            if !value.is_finite() || value < 0.0 {
                return Err(AppError::Validation(
                    "Lead value must be a non-negative number".to_string(),
                ));
            }
        }
        if let Some(status) = &self.status {
            LeadStatus::parse(status).map_err(AppError::Validation)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteLeadRequest {
    pub id: Value,
}

impl Validate for DeleteLeadRequest {
    fn validate(&self) -> Result<(), AppError> {
        RecordId::from_json(&self.id).map_err(AppError::Validation)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadWriteResponse {
    /// "synced" or "saved_on_device"; screens word their confirmation
    /// toast off this.
    pub outcome: String,
    pub record_id: Value,
    /// Full document when the remote returned one.
    pub record: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadDto {
    pub id: Value,
    pub name: String,
    pub company: Option<String>,
    pub value: f64,
    pub status: String,
    pub owner: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}
