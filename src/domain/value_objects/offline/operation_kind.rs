use serde::{Deserialize, Serialize};

/// Mutation kinds that may be deferred while offline. Deletes are
/// deliberately absent: they are blocked without a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationKind {
    Insert,
    Update,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Insert => "insert",
            OperationKind::Update => "update",
        }
    }

    pub fn parse(value: &str) -> Result<Self, String> {
        match value {
            "insert" => Ok(OperationKind::Insert),
            "update" => Ok(OperationKind::Update),
            other => Err(format!("Unknown operation kind: {other}")),
        }
    }
}
