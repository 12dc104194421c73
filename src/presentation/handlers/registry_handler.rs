use crate::application::services::offline_service::{OfflineServiceTrait, WriteOutcome};
use crate::domain::entities::customer::Customer;
use crate::domain::value_objects::{Collection, OperationPayload};
use crate::presentation::dto::{
    CustomerDto, CustomerWriteResponse, SaveCustomerRequest, UpdateCustomerRequest, Validate,
};
use crate::shared::error::AppError;
use serde_json::Value;
use std::sync::Arc;

/// Customer-registry surface; same offline semantics as the pipeline.
pub struct RegistryHandler {
    offline_service: Arc<dyn OfflineServiceTrait>,
}

impl RegistryHandler {
    pub fn new(offline_service: Arc<dyn OfflineServiceTrait>) -> Self {
        Self { offline_service }
    }

    pub async fn save_customer(
        &self,
        request: SaveCustomerRequest,
    ) -> Result<CustomerWriteResponse, AppError> {
        request.validate()?;

        let customer = Customer::new(
            request.name,
            request.email,
            request.phone,
            request.company,
            request.owner,
        );
        let payload =
            OperationPayload::new(customer.to_document()?).map_err(AppError::Validation)?;
        let outcome = self
            .offline_service
            .submit_insert(Collection::customers(), payload)
            .await?;
        Ok(map_write_outcome(outcome))
    }

    pub async fn update_customer(
        &self,
        request: UpdateCustomerRequest,
    ) -> Result<CustomerWriteResponse, AppError> {
        request.validate()?;

        let payload =
            OperationPayload::new(request.into_patch()?).map_err(AppError::Validation)?;
        let outcome = self
            .offline_service
            .submit_update(Collection::customers(), payload)
            .await?;
        Ok(map_write_outcome(outcome))
    }

    pub async fn list_customers(&self) -> Result<Vec<CustomerDto>, AppError> {
        let documents = self
            .offline_service
            .merged_view(Collection::customers())
            .await?;
        documents.into_iter().map(map_customer_document).collect()
    }
}

fn map_write_outcome(outcome: WriteOutcome) -> CustomerWriteResponse {
    match outcome {
        WriteOutcome::Synced { record } => CustomerWriteResponse {
            outcome: "synced".to_string(),
            record_id: record.get("id").cloned().unwrap_or(Value::Null),
            record: Some(record),
        },
        WriteOutcome::SavedOnDevice { record_id, .. } => CustomerWriteResponse {
            outcome: "saved_on_device".to_string(),
            record_id: record_id.to_json(),
            record: None,
        },
    }
}

fn map_customer_document(document: Value) -> Result<CustomerDto, AppError> {
    let customer = Customer::from_document(document)
        .map_err(|err| AppError::Deserialization(err.to_string()))?;
    Ok(CustomerDto {
        id: customer.id.to_json(),
        name: customer.name,
        email: customer.email,
        phone: customer.phone,
        company: customer.company,
        owner: customer.owner,
        created_at: customer.created_at.timestamp(),
    })
}
