use crate::domain::value_objects::RecordId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Customer {
    pub id: RecordId,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub owner: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Customer {
    pub fn new(
        name: String,
        email: Option<String>,
        phone: Option<String>,
        company: Option<String>,
        owner: Option<String>,
    ) -> Self {
        Self {
            id: RecordId::phantom(),
            name,
            email,
            phone,
            company,
            owner,
            created_at: Utc::now(),
        }
    }

    pub fn to_document(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    pub fn from_document(document: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(document)
    }
}
