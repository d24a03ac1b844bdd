//! Core types and traits for the TrainingJob admission API.
//!
//! Request/response DTOs match the JSON shapes of the `/jobs` endpoints; the record types match
//! the `batch.rory109.com/v1` TrainingJob custom resource.

mod dto;
mod record;
mod traits;

pub use dto::*;
pub use record::*;
pub use traits::*;
