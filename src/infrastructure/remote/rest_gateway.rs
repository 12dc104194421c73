use crate::application::ports::remote_gateway::RemoteGateway;
use crate::domain::value_objects::{Collection, RecordId};
use crate::shared::config::RemoteConfig;
use crate::shared::error::AppError;
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use std::time::Duration;

/// PostgREST-style gateway to the hosted backend: one REST resource per
/// collection, `id=eq.` filters for row addressing.
pub struct RestRemoteGateway {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl RestRemoteGateway {
    pub fn new(config: &RemoteConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout))
            .build()
            .map_err(|err| AppError::Configuration(err.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn collection_url(&self, collection: &Collection) -> String {
        format!("{}/{}", self.base_url, collection.as_str())
    }

    fn record_url(&self, collection: &Collection, id: &RecordId) -> String {
        format!("{}?id=eq.{}", self.collection_url(collection), id)
    }

    fn request(&self, method: Method, url: String) -> RequestBuilder {
        let mut builder = self.client.request(method, url);
        if !self.api_key.is_empty() {
            builder = builder
                .header("apikey", &self.api_key)
                .bearer_auth(&self.api_key);
        }
        builder
    }

    /// Transport failures become `Network` via the error conversion; any
    /// HTTP response that is not a success is an application-level
    /// rejection, never an enqueue trigger.
    async fn check(response: Response) -> Result<Response, AppError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        if status == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!("{status}: {body}")));
        }
        Err(AppError::Rejected(format!("{status}: {body}")))
    }
}

#[async_trait]
impl RemoteGateway for RestRemoteGateway {
    async fn insert(&self, collection: &Collection, record: &Value) -> Result<Value, AppError> {
        let response = self
            .request(Method::POST, self.collection_url(collection))
            .header("Prefer", "return=representation")
            .json(record)
            .send()
            .await?;
        let body: Value = Self::check(response).await?.json().await?;

        // PostgREST wraps the created row in a one-element array.
        match body {
            Value::Array(mut rows) if !rows.is_empty() => Ok(rows.remove(0)),
            Value::Object(_) => Ok(body),
            other => Err(AppError::Deserialization(format!(
                "Unexpected create response: {other}"
            ))),
        }
    }

    async fn update(
        &self,
        collection: &Collection,
        id: &RecordId,
        patch: &Value,
    ) -> Result<(), AppError> {
        let response = self
            .request(Method::PATCH, self.record_url(collection, id))
            .json(patch)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn delete(&self, collection: &Collection, id: &RecordId) -> Result<(), AppError> {
        let response = self
            .request(Method::DELETE, self.record_url(collection, id))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn select_all(&self, collection: &Collection) -> Result<Vec<Value>, AppError> {
        let response = self
            .request(
                Method::GET,
                format!("{}?select=*", self.collection_url(collection)),
            )
            .send()
            .await?;
        let records: Vec<Value> = Self::check(response).await?.json().await?;
        Ok(records)
    }
}
