use async_trait::async_trait;
use lariat::application::ports::remote_gateway::RemoteGateway;
use lariat::domain::value_objects::{Collection, RecordId};
use lariat::shared::error::AppError;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Scriptable stand-in for the hosted backend. Holds server-side rows per
/// collection, assigns integer ids on insert, and can be driven offline,
/// made to fail after N calls, or told to reject specific record ids.
#[derive(Clone)]
pub struct MockRemoteGateway {
    records: Arc<RwLock<HashMap<String, Vec<Value>>>>,
    online: Arc<RwLock<bool>>,
    calls_before_failure: Arc<RwLock<Option<u32>>>,
    rejected_ids: Arc<RwLock<HashSet<String>>>,
    next_id: Arc<AtomicI64>,
    calls: Arc<RwLock<Vec<String>>>,
}

impl MockRemoteGateway {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
            online: Arc::new(RwLock::new(true)),
            calls_before_failure: Arc::new(RwLock::new(None)),
            rejected_ids: Arc::new(RwLock::new(HashSet::new())),
            next_id: Arc::new(AtomicI64::new(42)),
            calls: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub async fn set_online(&self, online: bool) {
        *self.online.write().await = online;
    }

    /// Let the next `calls` gateway calls succeed, then fail every later
    /// call with a network error, as if connectivity dropped mid-drain.
    pub async fn fail_after(&self, calls: u32) {
        *self.calls_before_failure.write().await = Some(calls);
    }

    pub async fn reject_record(&self, id: &RecordId) {
        self.rejected_ids.write().await.insert(id.to_string());
    }

    pub async fn seed(&self, collection: &Collection, rows: Vec<Value>) {
        self.records
            .write()
            .await
            .insert(collection.as_str().to_string(), rows);
    }

    pub async fn server_rows(&self, collection: &Collection) -> Vec<Value> {
        self.records
            .read()
            .await
            .get(collection.as_str())
            .cloned()
            .unwrap_or_default()
    }

    /// Call log ("insert leads", "update leads 42 …"), in arrival order.
    pub async fn call_log(&self) -> Vec<String> {
        self.calls.read().await.clone()
    }

    async fn gate(&self) -> Result<(), AppError> {
        if !*self.online.read().await {
            return Err(AppError::Network("no connection".to_string()));
        }
        let mut budget = self.calls_before_failure.write().await;
        if let Some(remaining) = budget.as_mut() {
            if *remaining == 0 {
                return Err(AppError::Network("connection dropped".to_string()));
            }
            *remaining -= 1;
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteGateway for MockRemoteGateway {
    async fn insert(&self, collection: &Collection, record: &Value) -> Result<Value, AppError> {
        self.gate().await?;

        let assigned = self.next_id.fetch_add(1, Ordering::SeqCst);
        let mut stored = record.clone();
        if let Value::Object(map) = &mut stored {
            map.insert("id".to_string(), json!(assigned));
        }

        self.records
            .write()
            .await
            .entry(collection.as_str().to_string())
            .or_default()
            .push(stored.clone());
        self.calls
            .write()
            .await
            .push(format!("insert {collection}"));
        Ok(stored)
    }

    async fn update(
        &self,
        collection: &Collection,
        id: &RecordId,
        patch: &Value,
    ) -> Result<(), AppError> {
        self.gate().await?;

        if self.rejected_ids.read().await.contains(&id.to_string()) {
            return Err(AppError::Rejected(format!("record {id} was rejected")));
        }

        let mut records = self.records.write().await;
        let rows = records
            .entry(collection.as_str().to_string())
            .or_default();
        let row = rows
            .iter_mut()
            .find(|row| row.get("id") == Some(&id.to_json()))
            .ok_or_else(|| AppError::Rejected(format!("record {id} does not exist")))?;

        if let (Value::Object(base), Value::Object(fields)) = (row, patch) {
            for (key, value) in fields {
                base.insert(key.clone(), value.clone());
            }
        }

        self.calls
            .write()
            .await
            .push(format!("update {collection} {id} {patch}"));
        Ok(())
    }

    async fn delete(&self, collection: &Collection, id: &RecordId) -> Result<(), AppError> {
        self.gate().await?;

        self.records
            .write()
            .await
            .entry(collection.as_str().to_string())
            .or_default()
            .retain(|row| row.get("id") != Some(&id.to_json()));
        self.calls
            .write()
            .await
            .push(format!("delete {collection} {id}"));
        Ok(())
    }

    async fn select_all(&self, collection: &Collection) -> Result<Vec<Value>, AppError> {
        self.gate().await?;
        Ok(self.server_rows(collection).await)
    }
}
