pub mod customer_dto;
pub mod lead_dto;

use crate::shared::error::AppError;

/// Request-level validation, run before anything touches the remote or the
/// queue. Failures surface immediately and are never enqueued.
pub trait Validate {
    fn validate(&self) -> Result<(), AppError>;
}

pub use customer_dto::{CustomerDto, CustomerWriteResponse, SaveCustomerRequest, UpdateCustomerRequest};
pub use lead_dto::{DeleteLeadRequest, LeadDto, LeadWriteResponse, SaveLeadRequest, UpdateLeadRequest};
