use super::Validate;
use crate::domain::value_objects::RecordId;
use crate::shared::error::AppError;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveCustomerRequest {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub owner: Option<String>,
}

impl Validate for SaveCustomerRequest {
    fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("Customer name is required".to_string()));
        }
        if let Some(email) = &self.email {
            if !email.contains('@') {
                return Err(AppError::Validation(format!("Invalid email: {email}")));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCustomerRequest {
    pub id: Value,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub owner: Option<String>,
}

impl UpdateCustomerRequest {
    pub fn into_patch(self) -> Result<Value, AppError> {
        let mut patch = Map::new();
        patch.insert("id".to_string(), self.id);
        if let Some(name) = self.name {
            patch.insert("name".to_string(), Value::from(name));
        }
        if let Some(email) = self.email {
            patch.insert("email".to_string(), Value::from(email));
        }
        if let Some(phone) = self.phone {
            patch.insert("phone".to_string(), Value::from(phone));
        }
        if let Some(company) = self.company {
            patch.insert("company".to_string(), Value::from(company));
        }
        if let Some(owner) = self.owner {
            patch.insert("owner".to_string(), Value::from(owner));
        }
        patch.insert("updated_at".to_string(), serde_json::to_value(Utc::now())?);
        Ok(Value::Object(patch))
    }
}

impl Validate for UpdateCustomerRequest {
    fn validate(&self) -> Result<(), AppError> {
        RecordId::from_json(&self.id).map_err(AppError::Validation)?;
        let has_changes = self.name.is_some()
            || self.email.is_some()
            || self.phone.is_some()
            || self.company.is_some()
            || self.owner.is_some();
        if !has_changes {
            return Err(AppError::Validation(
                "Update carries no changed fields".to_string(),
            ));
        }
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(AppError::Validation("Customer name is required".to_string()));
            }
        }
        if let Some(email) = &self.email {
            if !email.contains('@') {
                return Err(AppError::Validation(format!("Invalid email: {email}")));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerWriteResponse {
    pub outcome: String,
    pub record_id: Value,
    pub record: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDto {
    pub id: Value,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub owner: Option<String>,
    pub created_at: i64,
}
