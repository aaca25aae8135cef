//! Shared domain types for taskdeck: the task status enum, the client-side
//! view filter, and the validation schema applied to every task write.

pub mod filter;
pub mod status;
pub mod validate;

pub use filter::Filter;
pub use status::Status;
pub use validate::{validate, TaskDraft, ValidationError, TITLE_MAX};
