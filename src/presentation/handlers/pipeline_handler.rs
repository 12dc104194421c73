use crate::application::services::offline_service::{OfflineServiceTrait, WriteOutcome};
use crate::domain::entities::lead::Lead;
use crate::domain::value_objects::{Collection, OperationPayload, RecordId};
use crate::presentation::dto::{
    DeleteLeadRequest, LeadDto, LeadWriteResponse, SaveLeadRequest, UpdateLeadRequest, Validate,
};
use crate::shared::error::AppError;
use serde_json::Value;
use std::sync::Arc;

/// Save/update/delete/list surface behind the sales-pipeline screen.
pub struct PipelineHandler {
    offline_service: Arc<dyn OfflineServiceTrait>,
}

impl PipelineHandler {
    pub fn new(offline_service: Arc<dyn OfflineServiceTrait>) -> Self {
        Self { offline_service }
    }

    pub async fn save_lead(&self, request: SaveLeadRequest) -> Result<LeadWriteResponse, AppError> {
        request.validate()?;

        let lead = Lead::new(request.name, request.company, request.value, request.owner);
        let payload = to_payload(lead.to_document()?)?;
        let outcome = self
            .offline_service
            .submit_insert(Collection::leads(), payload)
            .await?;
        Ok(map_write_outcome(outcome))
    }

    pub async fn update_lead(
        &self,
        request: UpdateLeadRequest,
    ) -> Result<LeadWriteResponse, AppError> {
        request.validate()?;

        let payload = to_payload(request.into_patch()?)?;
        let outcome = self
            .offline_service
            .submit_update(Collection::leads(), payload)
            .await?;
        Ok(map_write_outcome(outcome))
    }

    pub async fn delete_lead(&self, request: DeleteLeadRequest) -> Result<(), AppError> {
        request.validate()?;

        let id = RecordId::from_json(&request.id).map_err(AppError::Validation)?;
        self.offline_service
            .submit_delete(Collection::leads(), id)
            .await
    }

    pub async fn list_pipeline(&self) -> Result<Vec<LeadDto>, AppError> {
        let documents = self
            .offline_service
            .merged_view(Collection::leads())
            .await?;
        documents.into_iter().map(map_lead_document).collect()
    }
}

fn to_payload(document: Value) -> Result<OperationPayload, AppError> {
    OperationPayload::new(document).map_err(AppError::Validation)
}

fn map_write_outcome(outcome: WriteOutcome) -> LeadWriteResponse {
    match outcome {
        WriteOutcome::Synced { record } => LeadWriteResponse {
            outcome: "synced".to_string(),
            record_id: record.get("id").cloned().unwrap_or(Value::Null),
            record: Some(record),
        },
        WriteOutcome::SavedOnDevice { record_id, .. } => LeadWriteResponse {
            outcome: "saved_on_device".to_string(),
            record_id: record_id.to_json(),
            record: None,
        },
    }
}

fn map_lead_document(document: Value) -> Result<LeadDto, AppError> {
    let lead = Lead::from_document(document)
        .map_err(|err| AppError::Deserialization(err.to_string()))?;
    Ok(LeadDto {
        id: lead.id.to_json(),
        name: lead.name,
        company: lead.company,
        value: lead.value,
        status: lead.status.as_str().to_string(),
        owner: lead.owner,
        created_at: lead.created_at.timestamp(),
        updated_at: lead.updated_at.timestamp(),
    })
}
