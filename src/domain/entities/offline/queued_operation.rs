use crate::domain::value_objects::{Collection, OperationKind, OperationPayload, SequenceId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One deferred mutation. Created when a write fails on a network error,
/// removed after successful replay, never mutated in place.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueuedOperation {
    pub sequence_id: SequenceId,
    pub kind: OperationKind,
    pub collection: Collection,
    pub payload: OperationPayload,
    /// Informational only; replay order is governed by `sequence_id`.
    pub enqueued_at: DateTime<Utc>,
}

impl QueuedOperation {
    pub fn new(
        sequence_id: SequenceId,
        kind: OperationKind,
        collection: Collection,
        payload: OperationPayload,
        enqueued_at: DateTime<Utc>,
    ) -> Self {
        Self {
            sequence_id,
            kind,
            collection,
            payload,
            enqueued_at,
        }
    }
}

/// What a caller hands to the queue; the sequence id and timestamp are
/// assigned at enqueue time.
#[derive(Debug, Clone, PartialEq)]
pub struct QueuedOperationDraft {
    pub kind: OperationKind,
    pub collection: Collection,
    pub payload: OperationPayload,
}

impl QueuedOperationDraft {
    pub fn new(kind: OperationKind, collection: Collection, payload: OperationPayload) -> Self {
        Self {
            kind,
            collection,
            payload,
        }
    }
}
