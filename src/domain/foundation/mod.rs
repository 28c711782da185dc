//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, enums, and error types
//! that form the vocabulary of the cycle cache.

mod cycle_status;
mod errors;
mod ids;
mod timestamp;

pub use cycle_status::CycleStatus;
pub use errors::ValidationError;
pub use ids::{CycleId, ProjectId, WorkspaceSlug};
pub use timestamp::Timestamp;
