pub mod customer;
pub mod lead;
pub mod offline;

pub use customer::Customer;
pub use lead::{Lead, LeadStatus};
