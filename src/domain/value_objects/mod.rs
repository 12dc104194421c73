pub mod offline;

pub use offline::{Collection, OperationKind, OperationPayload, RecordId, SequenceId};
