pub mod collection;
pub mod operation_kind;
pub mod payload;
pub mod record_id;
pub mod sequence_id;

pub use collection::Collection;
pub use operation_kind::OperationKind;
pub use payload::OperationPayload;
pub use record_id::{RecordId, PHANTOM_PREFIX};
pub use sequence_id::SequenceId;
